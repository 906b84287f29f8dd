use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::CookieQueryError;

pub const DEFAULT_DB_PATH: &str = "Cookies";
pub const DEFAULT_TABLE: &str = "cookies";
pub const DEFAULT_COLUMN: &str = "host_key";
pub const DEFAULT_LIMIT: u32 = 10;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Options for one query run against a cookies database.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub db_path: PathBuf,
    pub table: String,
    pub column: String,
    pub limit: u32,
    /// How long SQLite waits on a locked file before giving up. `None` keeps the driver default.
    pub busy_timeout: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table: DEFAULT_TABLE.to_string(),
            column: DEFAULT_COLUMN.to_string(),
            limit: DEFAULT_LIMIT,
            busy_timeout: None,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(db_path: impl Into<PathBuf>) -> QueryOptionsBuilder {
        QueryOptionsBuilder::new(db_path)
    }

    /// Check identifiers and limit before anything touches the file.
    ///
    /// # Errors
    /// Returns `CookieQueryError::Config` if the table or column is not a plain identifier,
    /// or the limit is zero.
    pub fn validate(&self) -> Result<(), CookieQueryError> {
        check_identifier("table", &self.table)?;
        check_identifier("column", &self.column)?;
        if self.limit == 0 {
            return Err(CookieQueryError::Config(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The SELECT this run executes. The row limit is bound as `?1`.
    ///
    /// Names are backtick-quoted: SQLite turns an unknown double-quoted name into a
    /// string literal, but an unknown backtick-quoted name is always an error.
    ///
    /// # Errors
    /// Returns `CookieQueryError::Config` if validation fails.
    pub fn statement(&self) -> Result<String, CookieQueryError> {
        self.validate()?;
        Ok(format!(
            "select `{}` from `{}` limit ?1",
            self.column, self.table
        ))
    }
}

fn check_identifier(kind: &str, name: &str) -> Result<(), CookieQueryError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(CookieQueryError::Config(format!(
            "{kind} name {name:?} is not a valid identifier"
        )))
    }
}

/// Fluent builder for `QueryOptions`.
#[derive(Debug, Clone)]
pub struct QueryOptionsBuilder {
    opts: QueryOptions,
}

impl QueryOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            opts: QueryOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.opts.table = table.into();
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.opts.column = column.into();
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.opts.limit = limit;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Option<Duration>) -> Self {
        self.opts.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn finish(self) -> QueryOptions {
        self.opts
    }
}
