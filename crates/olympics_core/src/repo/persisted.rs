//! Cache-plus-medium composition shared by every durable backend.
//!
//! # Responsibility
//! - Load the medium once at construction (find-on-load).
//! - Delegate every operation to the in-memory cache, then write through.
//!
//! # Invariants
//! - Write-through runs only after a fresh insert, a real update or a real
//!   removal, never on a no-op.
//! - A failed write-through keeps the cache change and surfaces the error.

use crate::model::{Entity, EntityId};
use crate::repo::memory::InMemoryRepository;
use crate::repo::{RepoResult, Repository};
use crate::validation::Validator;
use log::{debug, error, info, warn};
use std::time::Instant;

/// One cache change that must reach the medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<'a, T> {
    Inserted(&'a T),
    Updated(&'a T),
    Deleted(EntityId),
}

impl<T> Change<'_, T> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inserted(_) => "insert",
            Self::Updated(_) => "update",
            Self::Deleted(_) => "delete",
        }
    }
}

/// Storage medium strategy plugged under the in-memory cache.
pub trait Persister<T: Entity> {
    /// Short backend name used in log events.
    fn backend(&self) -> &'static str;

    /// Reads every stored entity from the medium.
    fn load_all(&mut self) -> RepoResult<Vec<T>>;

    /// Mirrors one cache change to the medium.
    ///
    /// `current` is the cache state after the change; whole-medium backends
    /// rewrite from it, targeted backends only use `change`.
    fn write_through(
        &mut self,
        change: Change<'_, T>,
        current: &InMemoryRepository<T>,
    ) -> RepoResult<()>;
}

/// Repository that keeps an in-memory cache in sync with a medium.
pub struct PersistedRepository<T: Entity, P: Persister<T>> {
    cache: InMemoryRepository<T>,
    persister: P,
}

impl<T: Entity, P: Persister<T>> PersistedRepository<T, P> {
    /// Loads every stored entity through `persister` into a validated cache.
    ///
    /// # Side effects
    /// - Emits a `repo_load` event with backend, entity and count.
    ///
    /// # Errors
    /// - Fails when the medium cannot be read or a stored entity does not
    ///   parse or validate.
    pub fn open(validator: Box<dyn Validator<T>>, mut persister: P) -> RepoResult<Self> {
        let started_at = Instant::now();
        let entity = T::schema().name;
        let backend = persister.backend();

        let loaded = persister.load_all().map_err(|err| {
            error!(
                "event=repo_load module=repo status=error backend={backend} entity={entity} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            err
        })?;

        let mut cache = InMemoryRepository::new(validator);
        let mut duplicates = 0usize;
        for item in loaded {
            let id = item.id();
            if !cache.insert_loaded(item)? {
                duplicates += 1;
                warn!(
                    "event=repo_load module=repo status=duplicate backend={backend} entity={entity} id={id}"
                );
            }
        }

        info!(
            "event=repo_load module=repo status=ok backend={backend} entity={entity} count={} duplicates={duplicates} duration_ms={}",
            cache.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self { cache, persister })
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn write_through(&mut self, change: Change<'_, T>) -> RepoResult<()> {
        let started_at = Instant::now();
        let backend = self.persister.backend();
        let entity = T::schema().name;
        let op = change.label();

        match self.persister.write_through(change, &self.cache) {
            Ok(()) => {
                debug!(
                    "event=write_through module=repo status=ok backend={backend} entity={entity} op={op} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=write_through module=repo status=error backend={backend} entity={entity} op={op} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

impl<T: Entity, P: Persister<T>> Repository<T> for PersistedRepository<T, P> {
    fn find_one(&self, id: EntityId) -> Option<T> {
        self.cache.find_one(id)
    }

    fn find_all(&self) -> Vec<T> {
        self.cache.find_all()
    }

    fn save(&mut self, entity: T) -> RepoResult<Option<T>> {
        let stored = entity.clone();
        let existing = self.cache.save(entity)?;
        if existing.is_none() {
            self.write_through(Change::Inserted(&stored))?;
        }
        Ok(existing)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<Option<T>> {
        let removed = self.cache.delete(id)?;
        if removed.is_some() {
            self.write_through(Change::Deleted(id))?;
        }
        Ok(removed)
    }

    fn update(&mut self, entity: T) -> RepoResult<Option<T>> {
        let stored = entity.clone();
        let previous = self.cache.update(entity)?;
        if previous.is_some() {
            self.write_through(Change::Updated(&stored))?;
        }
        Ok(previous)
    }
}
