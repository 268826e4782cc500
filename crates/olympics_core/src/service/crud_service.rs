//! Generic CRUD service.
//!
//! # Responsibility
//! - Provide stable add/get/list/update/remove entry points per entity.
//! - Delegate persistence and validation to the boxed repository.

use crate::model::{Athlete, Competition, Entity, EntityId, Participation, Sponsor, Sponsorship};
use crate::repo::{RepoResult, Repository};

pub type AthleteService = CrudService<Athlete>;
pub type CompetitionService = CrudService<Competition>;
pub type ParticipationService = CrudService<Participation>;
pub type SponsorService = CrudService<Sponsor>;
pub type SponsorshipService = CrudService<Sponsorship>;

/// Use-case wrapper over one entity repository.
pub struct CrudService<T: Entity> {
    repo: Box<dyn Repository<T>>,
}

impl<T: Entity> CrudService<T> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: Box<dyn Repository<T>>) -> Self {
        Self { repo }
    }

    /// Saves a new entity.
    ///
    /// Returns `None` when stored and `Some(existing)` when the id was taken.
    pub fn add(&mut self, entity: T) -> RepoResult<Option<T>> {
        self.repo.save(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<T> {
        self.repo.find_one(id)
    }

    pub fn list(&self) -> Vec<T> {
        self.repo.find_all()
    }

    /// Replaces an existing entity; `None` means no entity had that id.
    pub fn update(&mut self, entity: T) -> RepoResult<Option<T>> {
        self.repo.update(entity)
    }

    /// Deletes by id; `None` means no entity had that id.
    pub fn remove(&mut self, id: EntityId) -> RepoResult<Option<T>> {
        self.repo.delete(id)
    }

    /// Entities matching `predicate`, in id order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.repo
            .find_all()
            .into_iter()
            .filter(|entity| predicate(entity))
            .collect()
    }
}
