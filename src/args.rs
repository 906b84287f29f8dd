use clap::Parser;
use cookie_hosts::output::OutputFormat;
use cookie_hosts::sqlite::QueryOptions;
use cookie_hosts::sqlite::config::{DEFAULT_COLUMN, DEFAULT_DB_PATH, DEFAULT_LIMIT, DEFAULT_TABLE};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the host_key values stored in a Cookies database")]
pub(crate) struct Args {
    /// SQLite database file to read
    #[arg(default_value = DEFAULT_DB_PATH)]
    pub(crate) db_path: PathBuf,
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub(crate) table: String,
    #[arg(long, default_value = DEFAULT_COLUMN)]
    pub(crate) column: String,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub(crate) limit: u32,
    #[arg(long, value_enum, default_value = "tuples")]
    pub(crate) format: OutputFormat,
    /// Milliseconds to wait on a locked database
    #[arg(long)]
    pub(crate) busy_timeout: Option<u64>,
    /// Also append diagnostics to this file
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunConfig {
    pub(crate) db_path: PathBuf,
    pub(crate) table: String,
    pub(crate) column: String,
    pub(crate) limit: u32,
    pub(crate) format: OutputFormat,
    pub(crate) busy_timeout_ms: Option<u64>,
    pub(crate) log: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl RunConfig {
    pub(crate) fn from_args(args: Args) -> Self {
        RunConfig {
            db_path: args.db_path,
            table: args.table,
            column: args.column,
            limit: args.limit,
            format: args.format,
            busy_timeout_ms: args.busy_timeout,
            log: args.log,
            verbose: args.verbose,
        }
    }

    pub(crate) fn query_options(&self) -> QueryOptions {
        QueryOptions::builder(self.db_path.clone())
            .table(self.table.clone())
            .column(self.column.clone())
            .limit(self.limit)
            .busy_timeout(self.busy_timeout_ms.map(Duration::from_millis))
            .finish()
    }
}
