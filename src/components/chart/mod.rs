//! Chart - Series Alignment and Chart Lifecycle

pub mod aligner;
pub mod slot;
pub mod terminal;

pub use aligner::*;
pub use slot::*;
pub use terminal::TerminalChart;
