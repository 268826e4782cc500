//! Builds one boxed repository from configuration.

use crate::config::{BackendKind, DatabaseConfig, RepositorySettings};
use crate::db::DatabaseProvider;
use crate::model::Entity;
use crate::repo::file::open_file_repository;
use crate::repo::memory::InMemoryRepository;
use crate::repo::sql::open_sql_repository;
use crate::repo::xml::open_xml_repository;
use crate::repo::{RepoError, RepoResult, Repository};
use crate::validation::{require_present, MissingValueError};

/// Opens the backend selected by `settings` with the entity's default validator.
///
/// # Errors
/// - `MissingValue` when the backend needs a path, table or database section
///   that is absent.
/// - Any load failure of the selected backend.
pub fn open_repository<T: Entity>(
    settings: &RepositorySettings,
    database: Option<&DatabaseConfig>,
) -> RepoResult<Box<dyn Repository<T>>> {
    let validator = T::default_validator();
    let repository: Box<dyn Repository<T>> = match settings.backend {
        BackendKind::InMemory => Box::new(InMemoryRepository::new(validator)),
        BackendKind::Csv => {
            let path = require_present(settings.path.as_ref(), "file path")?;
            Box::new(open_file_repository(path, validator)?)
        }
        BackendKind::Xml => {
            let path = require_present(settings.path.as_ref(), "file path")?;
            Box::new(open_xml_repository(path, validator)?)
        }
        BackendKind::Jdbc => {
            let table = require_present(settings.table.as_deref(), "table name")?;
            let database = database.ok_or(RepoError::MissingValue(MissingValueError {
                what: "database configuration",
            }))?;
            let provider = DatabaseProvider::new(
                database.url.clone(),
                database.user.clone(),
                database.password.clone(),
            );
            Box::new(open_sql_repository(provider, table, validator)?)
        }
    };
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::open_repository;
    use crate::config::{BackendKind, RepositorySettings};
    use crate::model::Sponsor;
    use crate::repo::RepoError;

    #[test]
    fn in_memory_backend_starts_empty() {
        let repo = open_repository::<Sponsor>(&RepositorySettings::in_memory(), None).unwrap();
        assert!(repo.find_all().is_empty());
    }

    #[test]
    fn file_backend_without_path_is_missing_value() {
        let settings = RepositorySettings {
            backend: BackendKind::Csv,
            ..RepositorySettings::default()
        };
        let err = open_repository::<Sponsor>(&settings, None).err().unwrap();
        assert!(matches!(err, RepoError::MissingValue(ref missing) if missing.what == "file path"));
    }

    #[test]
    fn jdbc_backend_without_database_is_missing_value() {
        let err = open_repository::<Sponsor>(&RepositorySettings::table("Sponsors"), None)
            .err()
            .unwrap();
        assert!(matches!(err, RepoError::MissingValue(_)));
    }
}
