//! Core domain logic for the Olympics data manager.
//! Entities, validation, swappable repository backends, services and
//! cross-entity orchestration live here; front ends only call into them.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{AppConfig, BackendKind, ConfigError, DatabaseConfig, RepositorySettings};
pub use controller::{Controller, ControllerError, ControllerResult};
pub use db::{DatabaseProvider, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Athlete, Competition, Entity, EntityId, ParseError, Participation, Sponsor, Sponsorship,
};
pub use repo::{open_repository, RepoError, RepoResult, Repository};
pub use service::{CrudService, Report, ReportKind, ReportService};
pub use validation::{MissingValueError, ValidationError, Validator};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
