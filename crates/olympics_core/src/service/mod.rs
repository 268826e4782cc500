//! Use-case services over the repository contract.
//!
//! # Responsibility
//! - Wrap one repository per entity with CRUD and filter entry points.
//! - Aggregate cross-entity reports from repository snapshots.
//!
//! # Invariants
//! - Services never bypass repository validation or write-through.
//! - Services remain storage-agnostic.

pub mod crud_service;
pub mod filters;
pub mod report_service;

pub use crud_service::{
    AthleteService, CompetitionService, CrudService, ParticipationService, SponsorService,
    SponsorshipService,
};
pub use report_service::{Report, ReportKind, ReportRow, ReportService};
