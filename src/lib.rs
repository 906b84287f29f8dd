//! Read `host_key` values out of a browser `Cookies` SQLite database.
//!
//! The whole run is one read-only query:
//! `select host_key from cookies limit 10`, opened, executed, fetched and closed by a
//! [`runner::QueryRunner`]. The connection is released on every exit path.

pub mod error;
pub mod output;
pub mod prelude;
pub mod results;
pub mod runner;
pub mod sqlite;
pub mod types;

pub use error::CookieQueryError;
pub use runner::QueryRunner;
