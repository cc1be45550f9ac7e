//! Application Layer
//!
//! Startup wiring and command dispatch for the binary.

pub mod application;
pub mod entities;
pub mod logging;
