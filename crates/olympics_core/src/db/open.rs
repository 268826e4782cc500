//! Per-call SQLite connection bootstrap.
//!
//! # Responsibility
//! - Open one configured connection per statement or query.
//! - Emit `db_open` logging events with status and duration.
//!
//! # Invariants
//! - Connections never outlive the call that opened them.
//! - Credentials are never logged.

use super::DbResult;
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const URL_PREFIXES: [&str; 3] = ["jdbc:sqlite:", "sqlite://", "sqlite:"];

/// Connection settings shared by every SQL-backed repository.
///
/// SQLite has no authentication; `user` and `password` are carried for
/// configuration parity and ignored when connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProvider {
    url: String,
    user: Option<String>,
    password: Option<String>,
}

impl DatabaseProvider {
    pub fn new(url: impl Into<String>, user: Option<String>, password: Option<String>) -> Self {
        Self {
            url: url.into(),
            user,
            password,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Database file path with any `jdbc:sqlite:`/`sqlite://` prefix removed.
    pub fn database_path(&self) -> PathBuf {
        let trimmed = URL_PREFIXES
            .iter()
            .find_map(|prefix| self.url.strip_prefix(prefix))
            .unwrap_or(&self.url);
        PathBuf::from(trimmed)
    }

    /// Opens a fresh connection.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn connect(&self) -> DbResult<Connection> {
        let started_at = Instant::now();
        let path = self.database_path();

        let conn = match Connection::open(&path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error path={} user={} duration_ms={} error_code=db_open_failed error={}",
                    path.display(),
                    self.user().unwrap_or("-"),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };
        conn.busy_timeout(Duration::from_secs(5))?;

        debug!(
            "event=db_open module=db status=ok path={} user={} duration_ms={}",
            path.display(),
            self.user().unwrap_or("-"),
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }

    /// Runs one statement and returns the number of affected rows.
    pub fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        let conn = self.connect()?;
        let changed = conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    /// Runs one query and maps every returned row.
    pub fn query<R>(
        &self,
        sql: &str,
        mut map_row: impl FnMut(&Row<'_>) -> rusqlite::Result<R>,
    ) -> DbResult<Vec<R>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut mapped = Vec::new();
        while let Some(row) = rows.next()? {
            mapped.push(map_row(row)?);
        }
        Ok(mapped)
    }
}
