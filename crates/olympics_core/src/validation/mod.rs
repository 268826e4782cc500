//! Entity validation contract and violation accumulation.
//!
//! # Responsibility
//! - Define the `Validator<T>` contract used by every repository write path.
//! - Collect every violated constraint before failing, never stopping early.
//!
//! # Invariants
//! - A failed validation yields exactly one error carrying all violations,
//!   in field declaration order.
//! - A missing value is a distinct failure and is never accumulated.

mod validators;

pub use validators::{
    AthleteValidator, CompetitionValidator, ParticipationValidator, SponsorValidator,
    SponsorshipValidator,
};

use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation contract for one entity type.
pub trait Validator<T> {
    /// Checks every constraint on `entity` and fails once with all violations.
    fn validate(&self, entity: &T) -> Result<(), ValidationError>;
}

/// Ordered list of violation messages collected during one check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` when `violated` holds.
    pub fn check(&mut self, violated: bool, message: impl FnOnce() -> String) {
        if violated {
            self.messages.push(message());
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `Ok(())` when nothing was recorded, otherwise the error built
    /// from all recorded messages.
    pub fn into_result<E>(self, into_error: impl FnOnce(Vec<String>) -> E) -> Result<(), E> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(into_error(self.messages))
        }
    }
}

/// One or more field constraints violated by a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub entity: &'static str,
    pub id: EntityId,
    pub violations: Vec<String>,
}

impl ValidationError {
    /// Builds the failure for `entity #id` from collected violations, if any.
    pub fn check(entity: &'static str, id: EntityId, violations: Violations) -> Result<(), Self> {
        violations.into_result(|violations| Self {
            entity,
            id,
            violations,
        })
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} #{}: {}",
            self.entity,
            self.id,
            self.violations.join(" ")
        )
    }
}

impl Error for ValidationError {}

/// A required argument was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingValueError {
    pub what: &'static str,
}

impl Display for MissingValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "the {} must be provided", self.what)
    }
}

impl Error for MissingValueError {}

/// Unwraps a required argument or fails immediately.
pub fn require_present<T>(value: Option<T>, what: &'static str) -> Result<T, MissingValueError> {
    value.ok_or(MissingValueError { what })
}
