use std::sync::Arc;

use async_trait::async_trait;
use models::pet::{self, Pet, PetFilter, PetPatch};
use models::results::{DeleteResult, UpdateResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn insert(&self, pet: &Pet) -> Result<(), ServiceError>;
    async fn list(&self, filter: &PetFilter) -> Result<Vec<Pet>, ServiceError>;
    /// Newest first by `date`, at most `limit` records.
    async fn recent(&self, limit: u64) -> Result<Vec<Pet>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Pet>, ServiceError>;
    async fn update(&self, id: Uuid, patch: &PetPatch) -> Result<UpdateResult, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPetRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PetRepository for SeaOrmPetRepository {
    async fn insert(&self, p: &Pet) -> Result<(), ServiceError> {
        pet::Entity::insert(pet::ActiveModel::from(p)).exec(&self.db).await?;
        Ok(())
    }

    async fn list(&self, filter: &PetFilter) -> Result<Vec<Pet>, ServiceError> {
        let mut q = pet::Entity::find();
        if let Some(email) = &filter.email {
            q = q.filter(pet::Column::OwnerEmail.eq(email.clone()));
        }
        if let Some(category) = &filter.category {
            q = q.filter(pet::Column::Category.eq(category.clone()));
        }
        let rows = q.all(&self.db).await?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Pet>, ServiceError> {
        let rows = pet::Entity::find()
            .order_by_desc(pet::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Pet>, ServiceError> {
        Ok(pet::Entity::find_by_id(id).one(&self.db).await?.map(Pet::from))
    }

    async fn update(&self, id: Uuid, patch: &PetPatch) -> Result<UpdateResult, ServiceError> {
        // 行锁保证 read-merge-write 不丢失并发更新
        let txn = self.db.begin().await?;
        let Some(row) = pet::Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
            txn.commit().await?;
            return Ok(UpdateResult::unmatched());
        };
        let mut doc = Pet::from(row);
        let changed = doc.apply(patch);
        if changed {
            pet::ActiveModel::from(&doc).update(&txn).await?;
        }
        txn.commit().await?;
        Ok(UpdateResult::matched(changed))
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError> {
        let res = pet::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(DeleteResult::new(res.rows_affected))
    }
}

/// Document-store repository for the `file://` and `memory://` backends.
pub struct DocumentPetRepository {
    store: Arc<JsonMapStore<Uuid, Pet>>,
}

impl DocumentPetRepository {
    pub fn new(store: Arc<JsonMapStore<Uuid, Pet>>) -> Self { Self { store } }
}

#[async_trait]
impl PetRepository for DocumentPetRepository {
    async fn insert(&self, p: &Pet) -> Result<(), ServiceError> {
        self.store.insert(p.id, p.clone()).await
    }

    async fn list(&self, filter: &PetFilter) -> Result<Vec<Pet>, ServiceError> {
        let mut pets: Vec<Pet> = self.store.values().await.into_iter().filter(|p| filter.matches(p)).collect();
        // HashMap order is arbitrary; creation order reads better
        pets.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(pets)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Pet>, ServiceError> {
        let mut pets = self.store.values().await;
        pets.sort_by(|a, b| b.date.cmp(&a.date));
        pets.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(pets)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Pet>, ServiceError> {
        Ok(self.store.get(&id).await)
    }

    async fn update(&self, id: Uuid, patch: &PetPatch) -> Result<UpdateResult, ServiceError> {
        let outcome = self.store.modify(&id, |p| p.apply(patch)).await?;
        Ok(outcome.map_or_else(UpdateResult::unmatched, UpdateResult::matched))
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError> {
        let existed = self.store.remove(&id).await?;
        Ok(DeleteResult::new(u64::from(existed)))
    }
}
