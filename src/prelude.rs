//! Convenient imports for common functionality.
//!
//! This module re-exports the types needed to configure a run, execute it and read
//! back its rows.

pub use crate::error::CookieQueryError;
pub use crate::output::{OutputFormat, render, write_result_set};
pub use crate::results::{ResultRow, ResultSet};
pub use crate::runner::QueryRunner;
pub use crate::sqlite::{Cursor, QueryOptions, QueryOptionsBuilder, QuerySession, SessionState};
pub use crate::types::CellValue;
