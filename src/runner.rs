use std::io::Write;

use tracing::{info, warn};

use crate::error::CookieQueryError;
use crate::output::{OutputFormat, write_result_set};
use crate::results::ResultSet;
use crate::sqlite::{QueryOptions, QuerySession};
use crate::types::CellValue;

/// Runs the host_key query against one database file.
///
/// Every run opens its own session and closes it before returning, whether the query
/// succeeded or not.
///
/// ```rust,no_run
/// use cookie_hosts::prelude::*;
///
/// let runner = QueryRunner::new(QueryOptions::default());
/// let hosts = runner.run()?;
/// for row in &hosts {
///     println!("{:?}", row.get("host_key"));
/// }
/// # Ok::<(), CookieQueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryRunner {
    options: QueryOptions,
}

impl QueryRunner {
    #[must_use]
    pub fn new(options: QueryOptions) -> Self {
        Self { options }
    }

    /// Open, execute, fetch and close.
    ///
    /// # Errors
    /// - `Config` if the options do not validate (nothing is opened).
    /// - `DatabaseAccess` if the file is missing, locked or not a database.
    /// - `QuerySyntaxOrSchema` if the table or column does not exist.
    pub fn run(&self) -> Result<ResultSet, CookieQueryError> {
        let sql = self.options.statement()?;
        let params = [CellValue::Int(i64::from(self.options.limit))];

        let session = QuerySession::open(&self.options)?;
        let fetched = Self::fetch(&session, &sql, &params);
        let closed = session.close();

        match (fetched, closed) {
            (Ok(result_set), Ok(())) => {
                info!(rows = result_set.len(), "query complete");
                Ok(result_set)
            }
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    warn!("error closing session after failed query: {close_err}");
                }
                Err(err)
            }
        }
    }

    /// Run the query and write the rows to `out`. Nothing is written unless the whole
    /// run succeeds.
    ///
    /// # Errors
    /// Returns any error from [`QueryRunner::run`], or `Output` if writing fails.
    pub fn run_to_writer<W: Write>(
        &self,
        out: &mut W,
        format: OutputFormat,
    ) -> Result<ResultSet, CookieQueryError> {
        let result_set = self.run()?;
        write_result_set(out, &result_set, format)?;
        Ok(result_set)
    }

    fn fetch(
        session: &QuerySession,
        sql: &str,
        params: &[CellValue],
    ) -> Result<ResultSet, CookieQueryError> {
        let mut cursor = session.cursor()?;
        cursor.execute(sql, params)?;
        cursor.fetch_all()
    }
}
