//! SQLite connection provisioning for the relational backend.
//!
//! # Responsibility
//! - Resolve connection settings into short-lived SQLite connections.
//! - Run single statements and queries, one connection per call.
//! - Guard identifiers that are interpolated into SQL text.
//!
//! # Invariants
//! - Every connection is closed before its call returns.
//! - Only identifiers matching `[A-Za-z_][A-Za-z0-9_]*` reach SQL text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::DatabaseProvider;

pub type DbResult<T> = Result<T, DbError>;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidIdentifier(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidIdentifier(name) => {
                write!(f, "`{name}` is not a valid SQL identifier")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidIdentifier(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `name` can be safely interpolated as a table or column name.
pub fn checked_identifier(name: &str) -> DbResult<&str> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}
