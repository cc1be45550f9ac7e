//! Weather dashboard: current conditions, forecast charts and the watch loop

pub mod controller;
pub mod watch;

pub use controller::{CurrentConditions, ForecastBundle, WeatherController, WeatherFetcher};
pub use watch::{WatchCommand, parse_command, run_watch};
