//! Entity-specific filters.
//!
//! All text filters compare exactly, without case folding or trimming.

use crate::model::{Athlete, Competition, EntityId, Participation, Sponsor, Sponsorship};
use crate::service::CrudService;

impl CrudService<Athlete> {
    pub fn filter_by_first_name(&self, first_name: &str) -> Vec<Athlete> {
        self.filter(|athlete| athlete.first_name == first_name)
    }

    pub fn filter_by_country(&self, country: &str) -> Vec<Athlete> {
        self.filter(|athlete| athlete.country == country)
    }
}

impl CrudService<Competition> {
    pub fn filter_by_location(&self, location: &str) -> Vec<Competition> {
        self.filter(|competition| competition.location == location)
    }
}

impl CrudService<Participation> {
    pub fn filter_by_rank(&self, rank: i32) -> Vec<Participation> {
        self.filter(|participation| participation.rank == rank)
    }

    pub fn filter_by_competition_id(&self, competition_id: EntityId) -> Vec<Participation> {
        self.filter(|participation| participation.competition_id == competition_id)
    }
}

impl CrudService<Sponsor> {
    pub fn filter_by_country(&self, country: &str) -> Vec<Sponsor> {
        self.filter(|sponsor| sponsor.country == country)
    }
}

impl CrudService<Sponsorship> {
    /// Sponsorships contributing at least `minimum`.
    pub fn filter_by_min_contribution(&self, minimum: i32) -> Vec<Sponsorship> {
        self.filter(|sponsorship| sponsorship.money_contribution >= minimum)
    }

    pub fn filter_by_sponsor_id(&self, sponsor_id: EntityId) -> Vec<Sponsorship> {
        self.filter(|sponsorship| sponsorship.sponsor_id == sponsor_id)
    }
}
