//! Fixed forecast tables backing the dashboard.
//!
//! The [`Dataset`] is built once at start-up, validated, and then only read.

pub mod constants;
pub mod dataset;
pub mod error;
pub mod period;
pub mod source;
pub mod table;

pub use dataset::{Dataset, REGIONAL_COMPLETE, approx_eq};
pub use error::{DatasetError, Result};
pub use period::Period;
pub use source::{DatasetSource, RowSource, TableSource};
pub use table::{Table, TableKind, TableName};
