//! Features - Vertical Feature Slices
//!
//! Each feature owns its controller and the view state it renders.

pub mod measurements;
pub mod systems;
pub mod weather;
