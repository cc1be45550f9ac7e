//! Measurements - Daily Measurement Viewer

pub mod controller;
pub mod export;

pub use controller::MeasurementsController;
