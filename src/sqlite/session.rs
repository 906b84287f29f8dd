use std::cell::Cell;
use std::fmt;
use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags, Statement};
use tracing::{debug, info, warn};

use crate::error::CookieQueryError;
use crate::results::ResultSet;
use crate::types::CellValue;

use super::config::QueryOptions;
use super::query::build_result_set;

/// Where a session is in its open → query → close lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Connected,
    Executed,
    Fetched,
    Closed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unopened => "unopened",
            SessionState::Connected => "connected",
            SessionState::Executed => "executed",
            SessionState::Fetched => "fetched",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A read-only connection to one database file.
///
/// The connection is released exactly once: by [`QuerySession::close`], or by `Drop`
/// on any path that never reaches it.
pub struct QuerySession {
    conn: Option<Connection>,
    path: PathBuf,
    state: Cell<SessionState>,
}

impl QuerySession {
    /// Open `opts.db_path` read-only.
    ///
    /// A missing file is reported instead of being created.
    ///
    /// # Errors
    /// Returns `CookieQueryError::DatabaseAccess` if the file does not exist or SQLite
    /// refuses to open it.
    pub fn open(opts: &QueryOptions) -> Result<Self, CookieQueryError> {
        let path = opts.db_path.clone();
        if !path.is_file() {
            return Err(CookieQueryError::access(format!(
                "database file {} not found",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        if let Some(timeout) = opts.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        info!(path = %path.display(), "opened database");

        let session = Self {
            conn: Some(conn),
            path,
            state: Cell::new(SessionState::Unopened),
        };
        session.transition(SessionState::Unopened, SessionState::Connected)?;
        Ok(session)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Borrow a cursor for running one statement on this session.
    ///
    /// # Errors
    /// Returns `CookieQueryError::Lifecycle` unless the session is connected.
    pub fn cursor(&self) -> Result<Cursor<'_>, CookieQueryError> {
        self.expect_state(SessionState::Connected)?;
        let conn = self.connection()?;
        Ok(Cursor {
            conn,
            session: self,
            stmt: None,
        })
    }

    /// Close the connection and surface any error SQLite reports while doing so.
    ///
    /// # Errors
    /// Returns `CookieQueryError::DatabaseAccess` if SQLite fails to close the handle. The
    /// handle is still released when the returned connection is dropped.
    pub fn close(mut self) -> Result<(), CookieQueryError> {
        let Some(conn) = self.conn.take() else {
            return Err(CookieQueryError::Lifecycle("session already closed".into()));
        };
        match conn.close() {
            Ok(()) => {
                if self.state.get() != SessionState::Failed {
                    self.state.set(SessionState::Closed);
                }
                debug!(path = %self.path.display(), "closed database");
                Ok(())
            }
            Err((_conn, err)) => {
                self.state.set(SessionState::Failed);
                Err(CookieQueryError::DatabaseAccess {
                    message: format!("failed to close {}: {err}", self.path.display()),
                    source: Some(err),
                })
            }
        }
    }

    fn connection(&self) -> Result<&Connection, CookieQueryError> {
        self.conn
            .as_ref()
            .ok_or_else(|| CookieQueryError::Lifecycle("session already closed".into()))
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), CookieQueryError> {
        let current = self.state.get();
        if current == expected {
            Ok(())
        } else {
            Err(CookieQueryError::Lifecycle(format!(
                "expected session to be {expected}, found {current}"
            )))
        }
    }

    fn transition(&self, from: SessionState, to: SessionState) -> Result<(), CookieQueryError> {
        self.expect_state(from)?;
        debug!(%from, %to, "session transition");
        self.state.set(to);
        Ok(())
    }

    fn fail(&self) {
        self.state.set(SessionState::Failed);
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            warn!(
                path = %self.path.display(),
                state = %self.state.get(),
                "session dropped without close; releasing connection"
            );
            if let Err((_conn, err)) = conn.close() {
                warn!("error closing dropped session: {err}");
            }
        }
    }
}

impl fmt::Debug for QuerySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySession")
            .field("path", &self.path)
            .field("state", &self.state.get())
            .field("open", &self.conn.is_some())
            .finish()
    }
}

/// A statement handle borrowed from a [`QuerySession`].
pub struct Cursor<'s> {
    conn: &'s Connection,
    session: &'s QuerySession,
    stmt: Option<Statement<'s>>,
}

impl<'s> Cursor<'s> {
    /// Prepare `sql` and bind `params` positionally (`?1`, `?2`, ...).
    ///
    /// # Errors
    /// Returns the classified SQLite error if preparing or binding fails; the session
    /// is marked failed.
    pub fn execute(&mut self, sql: &str, params: &[CellValue]) -> Result<(), CookieQueryError> {
        self.session.expect_state(SessionState::Connected)?;
        match self.prepare_and_bind(sql, params) {
            Ok(stmt) => {
                self.stmt = Some(stmt);
                self.session
                    .transition(SessionState::Connected, SessionState::Executed)
            }
            Err(err) => {
                self.session.fail();
                Err(err)
            }
        }
    }

    /// Step every remaining row into memory.
    ///
    /// # Errors
    /// Returns `CookieQueryError::Lifecycle` if nothing was executed, or the classified
    /// SQLite error if stepping fails.
    pub fn fetch_all(&mut self) -> Result<ResultSet, CookieQueryError> {
        self.session.expect_state(SessionState::Executed)?;
        let Some(stmt) = self.stmt.as_mut() else {
            return Err(CookieQueryError::Lifecycle("no statement executed".into()));
        };
        match build_result_set(stmt) {
            Ok(result_set) => {
                self.session
                    .transition(SessionState::Executed, SessionState::Fetched)?;
                Ok(result_set)
            }
            Err(err) => {
                self.session.fail();
                Err(err)
            }
        }
    }

    fn prepare_and_bind(
        &self,
        sql: &str,
        params: &[CellValue],
    ) -> Result<Statement<'s>, CookieQueryError> {
        let conn: &'s Connection = self.conn;
        let mut stmt = conn.prepare(sql)?;
        if stmt.parameter_count() != params.len() {
            return Err(CookieQueryError::QuerySyntaxOrSchema {
                message: format!(
                    "statement expects {} parameters, got {}",
                    stmt.parameter_count(),
                    params.len()
                ),
                source: None,
            });
        }
        for (idx, value) in params.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, rusqlite::types::Value::from(value))?;
        }
        Ok(stmt)
    }
}
