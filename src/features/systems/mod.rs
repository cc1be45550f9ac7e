//! Systems - Administration of Monitored Systems

pub mod controller;

pub use controller::{Confirm, SystemsController};
