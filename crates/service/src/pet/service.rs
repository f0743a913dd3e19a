use std::sync::Arc;

use chrono::Utc;
use models::pet::{NewPet, Pet, PetFilter, PetPatch};
use models::results::{DeleteResult, InsertResult, UpdateResult};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::parse_id;
use crate::pet::repository::PetRepository;

/// How many pets `GET /pets/recent` returns at most.
pub const RECENT_LIMIT: u64 = 6;

/// Application service encapsulating pet catalog rules.
pub struct PetService<R: PetRepository + ?Sized = dyn PetRepository> {
    repo: Arc<R>,
}

impl<R: PetRepository + ?Sized> Clone for PetService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: PetRepository + ?Sized> PetService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate, stamp `date`, persist.
    #[instrument(skip_all)]
    pub async fn create(&self, input: NewPet) -> Result<InsertResult, ServiceError> {
        let pet = input.into_pet(Utc::now())?;
        self.repo.insert(&pet).await?;
        info!(id = %pet.id, category = %pet.category, "pet created");
        Ok(InsertResult::new(pet.id))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: PetFilter) -> Result<Vec<Pet>, ServiceError> {
        let pets = self.repo.list(&filter.normalized()).await?;
        info!(count = pets.len(), "list pets");
        Ok(pets)
    }

    #[instrument(skip(self))]
    pub async fn recent(&self) -> Result<Vec<Pet>, ServiceError> {
        let pets = self.repo.recent(RECENT_LIMIT).await?;
        info!(count = pets.len(), "recent pets");
        Ok(pets)
    }

    /// Fetch by raw path id; malformed ids are simply not found.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Pet, ServiceError> {
        let found = match parse_id(id) {
            Some(id) => self.repo.get(id).await?,
            None => None,
        };
        found.ok_or_else(|| ServiceError::not_found("Pet"))
    }

    /// Lookup used by other services; `None` when absent.
    pub async fn find(&self, id: Uuid) -> Result<Option<Pet>, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: PetPatch) -> Result<UpdateResult, ServiceError> {
        let Some(id) = parse_id(id) else { return Ok(UpdateResult::unmatched()) };
        let res = self.repo.update(id, &patch).await?;
        info!(%id, matched = res.matched_count, modified = res.modified_count, "updated pet");
        Ok(res)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<DeleteResult, ServiceError> {
        let Some(id) = parse_id(id) else { return Ok(DeleteResult::new(0)) };
        let res = self.repo.delete(id).await?;
        info!(%id, deleted = res.deleted_count, "deleted pet");
        Ok(res)
    }
}
