//! Components - Reusable View Building Blocks
//!
//! - `data_table`: local pagination and text tables
//! - `chart`: time alignment, chart slots and the terminal sink

pub mod chart;
pub mod data_table;
