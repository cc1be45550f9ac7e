//! DataTable - Paged Text Tables

pub mod column;
pub mod data_table;
pub mod pagination;

pub use column::*;
pub use data_table::*;
pub use pagination::*;
