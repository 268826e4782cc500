//! Startup configuration for repositories, database and logging.
//!
//! # Responsibility
//! - Load one TOML file into an explicit, immutable `AppConfig`.
//! - Reject backend selections that cannot be opened.
//!
//! # Invariants
//! - Configuration is resolved once at startup and never mutated afterwards.
//! - An entity without a `[repositories.<entity>]` section uses `inMemory`.
//!
//! # Example
//!
//! ```toml
//! [database]
//! url = "olympics.db"
//! user = "admin"
//!
//! [repositories.athlete]
//! backend = "csv"
//! path = "data/athletes.txt"
//!
//! [repositories.sponsor]
//! backend = "jdbc"
//! table = "Sponsors"
//! ```

use log::{error, info};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Storage strategy selected for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendKind {
    #[default]
    InMemory,
    Xml,
    Csv,
    Jdbc,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InMemory => "inMemory",
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Jdbc => "jdbc",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend selection for one entity repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySettings {
    #[serde(default)]
    pub backend: BackendKind,
    /// File path for `xml` and `csv` backends.
    pub path: Option<PathBuf>,
    /// Table name for the `jdbc` backend.
    pub table: Option<String>,
}

impl RepositorySettings {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(backend: BackendKind, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: Some(path.into()),
            table: None,
        }
    }

    pub fn table(table: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Jdbc,
            path: None,
            table: Some(table.into()),
        }
    }
}

/// Connection settings for the `jdbc` backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Per-entity repository sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoriesConfig {
    #[serde(default)]
    pub athlete: RepositorySettings,
    #[serde(default)]
    pub competition: RepositorySettings,
    #[serde(default)]
    pub participation: RepositorySettings,
    #[serde(default)]
    pub sponsor: RepositorySettings,
    #[serde(default)]
    pub sponsorship: RepositorySettings,
}

impl RepositoriesConfig {
    /// Sections paired with their entity key, in a fixed order.
    pub fn entries(&self) -> [(&'static str, &RepositorySettings); 5] {
        [
            ("athlete", &self.athlete),
            ("competition", &self.competition),
            ("participation", &self.participation),
            ("sponsor", &self.sponsor),
            ("sponsorship", &self.sponsorship),
        ]
    }
}

/// Optional logging defaults, overridden by command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub repositories: RepositoriesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Side effects
    /// - Emits a `config_load` event with status.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|content| Self::from_toml_str(&content));

        match &result {
            Ok(config) => info!(
                "event=config_load module=config status=ok path={} backends={}",
                path.display(),
                config.backend_summary()
            ),
            Err(err) => error!(
                "event=config_load module=config status=error path={} error={}",
                path.display(),
                err
            ),
        }
        result
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every selected backend has what it needs to open.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (entity, settings) in self.repositories.entries() {
            match settings.backend {
                BackendKind::InMemory => {}
                BackendKind::Xml | BackendKind::Csv => {
                    if settings.path.is_none() {
                        return Err(ConfigError::Invalid(format!(
                            "repositories.{entity}: backend `{}` requires `path`",
                            settings.backend
                        )));
                    }
                }
                BackendKind::Jdbc => {
                    if settings.table.is_none() {
                        return Err(ConfigError::Invalid(format!(
                            "repositories.{entity}: backend `jdbc` requires `table`"
                        )));
                    }
                    if self.database.is_none() {
                        return Err(ConfigError::Invalid(format!(
                            "repositories.{entity}: backend `jdbc` requires a [database] section"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn backend_summary(&self) -> String {
        self.repositories
            .entries()
            .iter()
            .map(|(entity, settings)| format!("{entity}:{}", settings.backend))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
