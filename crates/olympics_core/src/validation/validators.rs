//! Per-entity validators.
//!
//! Each validator checks its fields in declaration order and reports every
//! violation in one `ValidationError`.

use crate::model::{Athlete, Competition, Participation, Sponsor, Sponsorship};
use crate::validation::{ValidationError, Validator, Violations};

/// Athlete: positive id and age, non-empty names and country.
#[derive(Debug, Clone, Copy, Default)]
pub struct AthleteValidator;

impl Validator<Athlete> for AthleteValidator {
    fn validate(&self, entity: &Athlete) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(entity.id <= 0, || {
            format!("Athlete's ID must be strictly positive, but it is {}.", entity.id)
        });
        violations.check(entity.first_name.is_empty(), || {
            "Athlete's first name must be non-empty.".to_string()
        });
        violations.check(entity.last_name.is_empty(), || {
            "Athlete's last name must be non-empty.".to_string()
        });
        violations.check(entity.country.is_empty(), || {
            "Athlete's country must be non-empty.".to_string()
        });
        violations.check(entity.age <= 0, || {
            format!("Athlete's age must be strictly positive, but it is {}.", entity.age)
        });
        ValidationError::check("Athlete", entity.id, violations)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompetitionValidator;

impl Validator<Competition> for CompetitionValidator {
    fn validate(&self, entity: &Competition) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(entity.id <= 0, || {
            format!(
                "Competition's ID must be strictly positive, but it is {}.",
                entity.id
            )
        });
        violations.check(entity.location.is_empty(), || {
            "Competition's location must be non-empty.".to_string()
        });
        violations.check(entity.name.is_empty(), || {
            "Competition's name must be non-empty.".to_string()
        });
        violations.check(entity.description.is_empty(), || {
            "Competition's description must be non-empty.".to_string()
        });
        ValidationError::check("Competition", entity.id, violations)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParticipationValidator;

impl Validator<Participation> for ParticipationValidator {
    fn validate(&self, entity: &Participation) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(entity.id <= 0, || {
            format!(
                "Participation's ID must be strictly positive, but it is {}.",
                entity.id
            )
        });
        violations.check(entity.athlete_id <= 0, || {
            format!(
                "Participation's athleteId must be strictly positive, but it is {}.",
                entity.athlete_id
            )
        });
        violations.check(entity.competition_id <= 0, || {
            format!(
                "Participation's competitionId must be strictly positive, but it is {}.",
                entity.competition_id
            )
        });
        violations.check(entity.rank <= 0, || {
            format!(
                "Participation's rank must be strictly positive, but it is {}.",
                entity.rank
            )
        });
        ValidationError::check("Participation", entity.id, violations)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SponsorValidator;

impl Validator<Sponsor> for SponsorValidator {
    fn validate(&self, entity: &Sponsor) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(entity.id <= 0, || {
            format!("Sponsor's ID must be strictly positive, but it is {}.", entity.id)
        });
        violations.check(entity.name.is_empty(), || {
            "Sponsor's name must be non-empty.".to_string()
        });
        violations.check(entity.country.is_empty(), || {
            "Sponsor's country must be non-empty.".to_string()
        });
        ValidationError::check("Sponsor", entity.id, violations)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SponsorshipValidator;

impl Validator<Sponsorship> for SponsorshipValidator {
    fn validate(&self, entity: &Sponsorship) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(entity.id <= 0, || {
            format!(
                "Sponsorship's ID must be strictly positive, but it is {}.",
                entity.id
            )
        });
        violations.check(entity.competition_id <= 0, || {
            format!(
                "Sponsorship's competitionId must be strictly positive, but it is {}.",
                entity.competition_id
            )
        });
        violations.check(entity.sponsor_id <= 0, || {
            format!(
                "Sponsorship's sponsorId must be strictly positive, but it is {}.",
                entity.sponsor_id
            )
        });
        violations.check(entity.money_contribution <= 0, || {
            format!(
                "Sponsorship's money contribution must be strictly positive, but it is {}.",
                entity.money_contribution
            )
        });
        ValidationError::check("Sponsorship", entity.id, violations)
    }
}
