use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CookieQueryError {
    /// The database file could not be opened or read.
    #[error("Database access error: {message}")]
    DatabaseAccess {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// SQLite rejected the statement (unknown table or column, bad syntax, bad binding).
    #[error("Query syntax or schema error: {message}")]
    QuerySyntaxOrSchema {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl CookieQueryError {
    pub(crate) fn access(message: impl Into<String>) -> Self {
        CookieQueryError::DatabaseAccess {
            message: message.into(),
            source: None,
        }
    }

    /// Process exit status the binary reports for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            CookieQueryError::DatabaseAccess { .. } => 2,
            CookieQueryError::QuerySyntaxOrSchema { .. } => 3,
            CookieQueryError::Config(_) => 64,
            CookieQueryError::Lifecycle(_) | CookieQueryError::Output(_) => 1,
        }
    }

    #[must_use]
    pub fn is_database_access(&self) -> bool {
        matches!(self, CookieQueryError::DatabaseAccess { .. })
    }

    #[must_use]
    pub fn is_query_syntax_or_schema(&self) -> bool {
        matches!(self, CookieQueryError::QuerySyntaxOrSchema { .. })
    }
}

/// Sort a driver error into access vs. statement problems by its primary result code.
///
/// A file that is not a database opens fine and only fails once the schema is read
/// during prepare, so the step that failed says nothing about the kind of failure.
impl From<rusqlite::Error> for CookieQueryError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        let is_access = match &err {
            rusqlite::Error::SqliteFailure(ffi_err, _) => matches!(
                ffi_err.code,
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::PermissionDenied
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::FileLockingProtocolFailed
                    | ErrorCode::NoLargeFileSupport
                    | ErrorCode::NotFound
            ),
            rusqlite::Error::InvalidPath(_) => true,
            _ => false,
        };
        if is_access {
            CookieQueryError::DatabaseAccess {
                message,
                source: Some(err),
            }
        } else {
            CookieQueryError::QuerySyntaxOrSchema {
                message,
                source: Some(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: std::os::raw::c_int, msg: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), Some(msg.to_string()))
    }

    #[test]
    fn not_a_database_is_access_error() {
        let err = CookieQueryError::from(failure(
            rusqlite::ffi::SQLITE_NOTADB,
            "file is not a database",
        ));
        assert!(err.is_database_access());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn busy_is_access_error() {
        let err = CookieQueryError::from(failure(rusqlite::ffi::SQLITE_BUSY, "database is locked"));
        assert!(err.is_database_access());
    }

    #[test]
    fn generic_error_is_schema_error() {
        let err = CookieQueryError::from(failure(
            rusqlite::ffi::SQLITE_ERROR,
            "no such table: cookies",
        ));
        assert!(err.is_query_syntax_or_schema());
        assert!(err.to_string().contains("no such table"));
        assert_eq!(err.exit_code(), 3);
    }
}
