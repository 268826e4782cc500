//! Aggregate reports across entity services.
//!
//! # Responsibility
//! - Tally dependents per referenced entity for the four reports.
//!
//! # Invariants
//! - Every entity of the reported type appears, with value 0 when unreferenced.
//! - Rows are sorted by value descending, ties by id ascending.
//! - Dependents pointing at ids that no longer exist are ignored.

use crate::model::{Athlete, Competition, Entity, EntityId, Sponsor};
use crate::service::{
    AthleteService, CompetitionService, ParticipationService, SponsorService, SponsorshipService,
};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The available reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SponsorContributions,
    CompetitionSponsorships,
    AthleteParticipations,
    CompetitionParticipations,
}

impl ReportKind {
    pub const ALL: [Self; 4] = [
        Self::SponsorContributions,
        Self::CompetitionSponsorships,
        Self::AthleteParticipations,
        Self::CompetitionParticipations,
    ];

    /// Command-line name of the report.
    pub fn name(self) -> &'static str {
        match self {
            Self::SponsorContributions => "sponsor-contributions",
            Self::CompetitionSponsorships => "competition-sponsorships",
            Self::AthleteParticipations => "athlete-participations",
            Self::CompetitionParticipations => "competition-participations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// One reported entity with its aggregated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow<T> {
    pub entity: T,
    pub value: i64,
}

/// Sorted report rows with the unit shown next to each value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<T> {
    pub unit: &'static str,
    pub rows: Vec<ReportRow<T>>,
}

impl<T> Report<T> {
    /// `(id, value)` pairs in report order.
    pub fn values(&self) -> Vec<(EntityId, i64)>
    where
        T: Entity,
    {
        self.rows
            .iter()
            .map(|row| (row.entity.id(), row.value))
            .collect()
    }
}

impl<T: Display> Display for Report<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {} ({})", row.entity, row.value, self.unit)?;
        }
        Ok(())
    }
}

/// Read-only report generator borrowing the entity services.
pub struct ReportService<'a> {
    athletes: &'a AthleteService,
    competitions: &'a CompetitionService,
    participations: &'a ParticipationService,
    sponsors: &'a SponsorService,
    sponsorships: &'a SponsorshipService,
}

impl<'a> ReportService<'a> {
    pub fn new(
        athletes: &'a AthleteService,
        competitions: &'a CompetitionService,
        participations: &'a ParticipationService,
        sponsors: &'a SponsorService,
        sponsorships: &'a SponsorshipService,
    ) -> Self {
        Self {
            athletes,
            competitions,
            participations,
            sponsors,
            sponsorships,
        }
    }

    /// Total money contributed by each sponsor.
    pub fn sponsor_contributions(&self) -> Report<Sponsor> {
        tally(
            self.sponsors.list(),
            &self.sponsorships.list(),
            |sponsorship| sponsorship.sponsor_id,
            |sponsorship| i64::from(sponsorship.money_contribution),
            "USD",
        )
    }

    /// Number of sponsorships of each competition.
    pub fn competition_sponsorships(&self) -> Report<Competition> {
        tally(
            self.competitions.list(),
            &self.sponsorships.list(),
            |sponsorship| sponsorship.competition_id,
            |_| 1,
            "sponsors",
        )
    }

    /// Number of participations of each athlete.
    pub fn athlete_participations(&self) -> Report<Athlete> {
        tally(
            self.athletes.list(),
            &self.participations.list(),
            |participation| participation.athlete_id,
            |_| 1,
            "participations",
        )
    }

    /// Number of participating athletes of each competition.
    pub fn competition_participations(&self) -> Report<Competition> {
        tally(
            self.competitions.list(),
            &self.participations.list(),
            |participation| participation.competition_id,
            |_| 1,
            "athletes",
        )
    }

    /// Renders the report of the given kind as display text.
    pub fn render(&self, kind: ReportKind) -> String {
        match kind {
            ReportKind::SponsorContributions => self.sponsor_contributions().to_string(),
            ReportKind::CompetitionSponsorships => self.competition_sponsorships().to_string(),
            ReportKind::AthleteParticipations => self.athlete_participations().to_string(),
            ReportKind::CompetitionParticipations => {
                self.competition_participations().to_string()
            }
        }
    }
}

fn tally<T: Entity, D>(
    entities: Vec<T>,
    dependents: &[D],
    reference: impl Fn(&D) -> EntityId,
    weight: impl Fn(&D) -> i64,
    unit: &'static str,
) -> Report<T> {
    let mut totals: BTreeMap<EntityId, i64> =
        entities.iter().map(|entity| (entity.id(), 0)).collect();
    for dependent in dependents {
        if let Some(total) = totals.get_mut(&reference(dependent)) {
            *total += weight(dependent);
        }
    }

    let mut rows: Vec<ReportRow<T>> = entities
        .into_iter()
        .map(|entity| {
            let value = totals.get(&entity.id()).copied().unwrap_or(0);
            ReportRow { entity, value }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.entity.id().cmp(&b.entity.id()))
    });
    Report { unit, rows }
}
