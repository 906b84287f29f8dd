// SQLite module - read-only access to a cookies database
//
// - config: query options and the statement they render to
// - session: connection and cursor lifecycle
// - query: result extraction and building

pub mod config;
pub mod query;
pub mod session;

pub use config::{QueryOptions, QueryOptionsBuilder};
pub use query::build_result_set;
pub use session::{Cursor, QuerySession, SessionState};
