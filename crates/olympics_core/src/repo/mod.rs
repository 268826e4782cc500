//! Repository contract, in-memory cache and persistence backends.
//!
//! # Responsibility
//! - Define the keyed-store contract shared by every storage strategy.
//! - Compose the in-memory cache with one pluggable `Persister` per backend.
//!
//! # Invariants
//! - Every write validates before touching the cache or the medium.
//! - `save` returning `Some` means "already present, nothing written";
//!   `update`/`delete` returning `None` mean "absent, nothing written".
//! - Backends only write through after the cache reports a real change.
//! - The repository layer has no foreign-key awareness.

pub mod factory;
pub mod file;
pub mod memory;
pub mod persisted;
pub mod sql;
pub mod xml;

use crate::db::DbError;
use crate::model::{Entity, EntityId, ParseError};
use crate::validation::{MissingValueError, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use factory::open_repository;
pub use file::{open_file_repository, DelimitedFilePersister, FileRepository};
pub use memory::InMemoryRepository;
pub use persisted::{Change, PersistedRepository, Persister};
pub use sql::{open_sql_repository, SqlPersister, SqlRepository};
pub use xml::{open_xml_repository, XmlFilePersister, XmlRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure raised by repository construction or operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    MissingValue(MissingValueError),
    Parse(ParseError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Xml {
        path: PathBuf,
        message: String,
    },
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingValue(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "file error on `{}`: {source}", path.display())
            }
            Self::Xml { path, message } => {
                write!(f, "xml error on `{}`: {message}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::MissingValue(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Xml { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MissingValueError> for RepoError {
    fn from(value: MissingValueError) -> Self {
        Self::MissingValue(value)
    }
}

impl From<ParseError> for RepoError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed-store contract implemented by every backend.
pub trait Repository<T: Entity> {
    /// Returns the entity stored under `id`, if any.
    fn find_one(&self, id: EntityId) -> Option<T>;

    /// Snapshot of every stored entity.
    fn find_all(&self) -> Vec<T>;

    /// Inserts `entity` unless its id is taken.
    ///
    /// Returns `None` for a fresh insert and `Some(existing)` when the id was
    /// already present, in which case nothing is stored or persisted.
    fn save(&mut self, entity: T) -> RepoResult<Option<T>>;

    /// Removes the entity stored under `id` and returns it, if any.
    fn delete(&mut self, id: EntityId) -> RepoResult<Option<T>>;

    /// Replaces the entity with the same id and returns the previous value.
    ///
    /// Returns `None` when no entity has that id.
    fn update(&mut self, entity: T) -> RepoResult<Option<T>>;
}
