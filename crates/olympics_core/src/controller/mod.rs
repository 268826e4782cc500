//! Cross-entity orchestration.
//!
//! # Responsibility
//! - Own the five entity services and expose report generation.
//! - Check foreign keys before participations and sponsorships are written.
//! - Cascade deletes from athletes, competitions and sponsors to dependents.
//!
//! # Invariants
//! - References are checked in declaration order and the first missing one
//!   fails the call before anything is written.
//! - Dependents are removed one by one through their own repositories
//!   before the referenced entity.

use crate::config::AppConfig;
use crate::model::{
    Athlete, Competition, Entity, EntityId, Participation, Sponsor, Sponsorship,
};
use crate::repo::{open_repository, InMemoryRepository, RepoError, RepoResult};
use crate::service::{
    AthleteService, CompetitionService, CrudService, ParticipationService, ReportService,
    SponsorService, SponsorshipService,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    /// A referenced or targeted entity does not exist.
    UnknownReference { entity: &'static str, id: EntityId },
    Repo(RepoError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownReference { entity, id } => write!(
                f,
                "There is no {} with the given ID ({id}).",
                entity.to_ascii_lowercase()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownReference { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Application entry point over all entity services.
pub struct Controller {
    athletes: AthleteService,
    competitions: CompetitionService,
    participations: ParticipationService,
    sponsors: SponsorService,
    sponsorships: SponsorshipService,
}

impl Controller {
    pub fn new(
        athletes: AthleteService,
        competitions: CompetitionService,
        participations: ParticipationService,
        sponsors: SponsorService,
        sponsorships: SponsorshipService,
    ) -> Self {
        Self {
            athletes,
            competitions,
            participations,
            sponsors,
            sponsorships,
        }
    }

    /// Controller with every repository held in memory only.
    pub fn in_memory() -> Self {
        Self::new(
            memory_service(),
            memory_service(),
            memory_service(),
            memory_service(),
            memory_service(),
        )
    }

    /// Opens every repository selected by `config`.
    ///
    /// # Errors
    /// - Fails on the first repository that cannot be opened or loaded.
    pub fn from_config(config: &AppConfig) -> RepoResult<Self> {
        let database = config.database.as_ref();
        let repos = &config.repositories;
        let controller = Self::new(
            CrudService::new(open_repository(&repos.athlete, database)?),
            CrudService::new(open_repository(&repos.competition, database)?),
            CrudService::new(open_repository(&repos.participation, database)?),
            CrudService::new(open_repository(&repos.sponsor, database)?),
            CrudService::new(open_repository(&repos.sponsorship, database)?),
        );
        info!(
            "event=controller_ready module=controller status=ok athletes={} competitions={} participations={} sponsors={} sponsorships={}",
            controller.athletes.list().len(),
            controller.competitions.list().len(),
            controller.participations.list().len(),
            controller.sponsors.list().len(),
            controller.sponsorships.list().len()
        );
        Ok(controller)
    }

    pub fn athletes(&self) -> &AthleteService {
        &self.athletes
    }

    pub fn athletes_mut(&mut self) -> &mut AthleteService {
        &mut self.athletes
    }

    pub fn competitions(&self) -> &CompetitionService {
        &self.competitions
    }

    pub fn competitions_mut(&mut self) -> &mut CompetitionService {
        &mut self.competitions
    }

    pub fn participations(&self) -> &ParticipationService {
        &self.participations
    }

    pub fn sponsors(&self) -> &SponsorService {
        &self.sponsors
    }

    pub fn sponsors_mut(&mut self) -> &mut SponsorService {
        &mut self.sponsors
    }

    pub fn sponsorships(&self) -> &SponsorshipService {
        &self.sponsorships
    }

    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(
            &self.athletes,
            &self.competitions,
            &self.participations,
            &self.sponsors,
            &self.sponsorships,
        )
    }

    /// Adds a participation once its athlete and competition exist.
    pub fn add_participation(
        &mut self,
        participation: Participation,
    ) -> ControllerResult<Option<Participation>> {
        self.check_participation_refs(&participation)?;
        Ok(self.participations.add(participation)?)
    }

    /// Updates a participation once its athlete and competition exist.
    pub fn update_participation(
        &mut self,
        participation: Participation,
    ) -> ControllerResult<Option<Participation>> {
        self.check_participation_refs(&participation)?;
        Ok(self.participations.update(participation)?)
    }

    pub fn delete_participation(&mut self, id: EntityId) -> ControllerResult<Option<Participation>> {
        Ok(self.participations.remove(id)?)
    }

    /// Adds a sponsorship once its competition and sponsor exist.
    pub fn add_sponsorship(
        &mut self,
        sponsorship: Sponsorship,
    ) -> ControllerResult<Option<Sponsorship>> {
        self.check_sponsorship_refs(&sponsorship)?;
        Ok(self.sponsorships.add(sponsorship)?)
    }

    /// Updates a sponsorship once its competition and sponsor exist.
    pub fn update_sponsorship(
        &mut self,
        sponsorship: Sponsorship,
    ) -> ControllerResult<Option<Sponsorship>> {
        self.check_sponsorship_refs(&sponsorship)?;
        Ok(self.sponsorships.update(sponsorship)?)
    }

    pub fn delete_sponsorship(&mut self, id: EntityId) -> ControllerResult<Option<Sponsorship>> {
        Ok(self.sponsorships.remove(id)?)
    }

    /// Deletes an athlete and every participation referencing it.
    pub fn delete_athlete(&mut self, id: EntityId) -> ControllerResult<Option<Athlete>> {
        require_existing(&self.athletes, id)?;
        let dependents = self
            .participations
            .filter(|participation| participation.athlete_id == id);
        remove_all(&mut self.participations, &dependents)?;
        log_cascade(Athlete::schema().name, id, dependents.len(), 0);
        Ok(self.athletes.remove(id)?)
    }

    /// Deletes a competition with its participations and sponsorships.
    pub fn delete_competition(&mut self, id: EntityId) -> ControllerResult<Option<Competition>> {
        require_existing(&self.competitions, id)?;
        let participations = self.participations.filter_by_competition_id(id);
        remove_all(&mut self.participations, &participations)?;
        let sponsorships = self
            .sponsorships
            .filter(|sponsorship| sponsorship.competition_id == id);
        remove_all(&mut self.sponsorships, &sponsorships)?;
        log_cascade(
            Competition::schema().name,
            id,
            participations.len(),
            sponsorships.len(),
        );
        Ok(self.competitions.remove(id)?)
    }

    /// Deletes a sponsor and every sponsorship referencing it.
    pub fn delete_sponsor(&mut self, id: EntityId) -> ControllerResult<Option<Sponsor>> {
        require_existing(&self.sponsors, id)?;
        let dependents = self.sponsorships.filter_by_sponsor_id(id);
        remove_all(&mut self.sponsorships, &dependents)?;
        log_cascade(Sponsor::schema().name, id, 0, dependents.len());
        Ok(self.sponsors.remove(id)?)
    }

    fn check_participation_refs(&self, participation: &Participation) -> ControllerResult<()> {
        require_existing(&self.athletes, participation.athlete_id)?;
        require_existing(&self.competitions, participation.competition_id)
    }

    fn check_sponsorship_refs(&self, sponsorship: &Sponsorship) -> ControllerResult<()> {
        require_existing(&self.competitions, sponsorship.competition_id)?;
        require_existing(&self.sponsors, sponsorship.sponsor_id)
    }
}

fn memory_service<T: Entity>() -> CrudService<T> {
    CrudService::new(Box::new(InMemoryRepository::<T>::with_default_validator()))
}

fn require_existing<T: Entity>(service: &CrudService<T>, id: EntityId) -> ControllerResult<()> {
    match service.get(id) {
        Some(_) => Ok(()),
        None => Err(ControllerError::UnknownReference {
            entity: T::schema().name,
            id,
        }),
    }
}

fn remove_all<T: Entity>(service: &mut CrudService<T>, dependents: &[T]) -> RepoResult<()> {
    for dependent in dependents {
        service.remove(dependent.id())?;
    }
    Ok(())
}

fn log_cascade(entity: &str, id: EntityId, participations: usize, sponsorships: usize) {
    info!(
        "event=cascade_delete module=controller status=ok entity={entity} id={id} participations={participations} sponsorships={sponsorships}"
    );
}
