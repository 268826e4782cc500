//! In-memory repository: the canonical keyed store and cache layer.
//!
//! # Invariants
//! - Ids are unique; a duplicate `save` leaves the stored value untouched.
//! - Validation runs before every write.

use crate::model::{Entity, EntityId};
use crate::repo::{RepoResult, Repository};
use crate::validation::Validator;
use std::collections::BTreeMap;

/// Map-backed repository, also used as the cache beneath persisted backends.
pub struct InMemoryRepository<T: Entity> {
    entities: BTreeMap<EntityId, T>,
    validator: Box<dyn Validator<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(validator: Box<dyn Validator<T>>) -> Self {
        Self {
            entities: BTreeMap::new(),
            validator,
        }
    }

    /// Creates a repository using the entity's own validator.
    pub fn with_default_validator() -> Self {
        Self::new(T::default_validator())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Stored entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }

    /// Inserts an already persisted entity during find-on-load.
    ///
    /// Validates like `save` but never triggers write-through. Returns `false`
    /// when the id was already loaded.
    pub(crate) fn insert_loaded(&mut self, entity: T) -> RepoResult<bool> {
        self.validator.validate(&entity)?;
        match self.entities.entry(entity.id()) {
            std::collections::btree_map::Entry::Occupied(_) => Ok(false),
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entity);
                Ok(true)
            }
        }
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn find_one(&self, id: EntityId) -> Option<T> {
        self.entities.get(&id).cloned()
    }

    fn find_all(&self) -> Vec<T> {
        self.entities.values().cloned().collect()
    }

    fn save(&mut self, entity: T) -> RepoResult<Option<T>> {
        self.validator.validate(&entity)?;
        if let Some(existing) = self.entities.get(&entity.id()) {
            return Ok(Some(existing.clone()));
        }
        self.entities.insert(entity.id(), entity);
        Ok(None)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<Option<T>> {
        Ok(self.entities.remove(&id))
    }

    fn update(&mut self, entity: T) -> RepoResult<Option<T>> {
        self.validator.validate(&entity)?;
        match self.entities.get_mut(&entity.id()) {
            Some(slot) => Ok(Some(std::mem::replace(slot, entity))),
            None => Ok(None),
        }
    }
}
