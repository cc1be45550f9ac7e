//! Domain - Pure Data Structures and Wire Types
//!
//! These types don't depend on any transport or view and mirror the backend's
//! JSON records.

pub mod config;
pub mod measurement;
pub mod performance;
pub mod system;
pub mod weather;
