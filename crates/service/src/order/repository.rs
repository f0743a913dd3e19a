use std::sync::Arc;

use async_trait::async_trait;
use models::order::{self, Order, OrderFilter, OrderPatch};
use models::results::{DeleteResult, UpdateResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, TransactionTrait};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), ServiceError>;
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Order>, ServiceError>;
    async fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<UpdateResult, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmOrderRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn insert(&self, o: &Order) -> Result<(), ServiceError> {
        order::Entity::insert(order::ActiveModel::from(o)).exec(&self.db).await?;
        Ok(())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ServiceError> {
        let mut q = order::Entity::find();
        if let Some(email) = &filter.email {
            q = q.filter(order::Column::Email.eq(email.clone()));
        }
        let rows = q.all(&self.db).await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, ServiceError> {
        Ok(order::Entity::find_by_id(id).one(&self.db).await?.map(Order::from))
    }

    async fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<UpdateResult, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(row) = order::Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
            txn.commit().await?;
            return Ok(UpdateResult::unmatched());
        };
        let mut doc = Order::from(row);
        let changed = doc.apply(patch);
        if changed {
            order::ActiveModel::from(&doc).update(&txn).await?;
        }
        txn.commit().await?;
        Ok(UpdateResult::matched(changed))
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError> {
        let res = order::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(DeleteResult::new(res.rows_affected))
    }
}

/// Document-store repository for the `file://` and `memory://` backends.
pub struct DocumentOrderRepository {
    store: Arc<JsonMapStore<Uuid, Order>>,
}

impl DocumentOrderRepository {
    pub fn new(store: Arc<JsonMapStore<Uuid, Order>>) -> Self { Self { store } }
}

#[async_trait]
impl OrderRepository for DocumentOrderRepository {
    async fn insert(&self, o: &Order) -> Result<(), ServiceError> {
        self.store.insert(o.id, o.clone()).await
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ServiceError> {
        let mut orders: Vec<Order> = self.store.values().await.into_iter().filter(|o| filter.matches(o)).collect();
        orders.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(orders)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, ServiceError> {
        Ok(self.store.get(&id).await)
    }

    async fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<UpdateResult, ServiceError> {
        let outcome = self.store.modify(&id, |o| o.apply(patch)).await?;
        Ok(outcome.map_or_else(UpdateResult::unmatched, UpdateResult::matched))
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult, ServiceError> {
        let existed = self.store.remove(&id).await?;
        Ok(DeleteResult::new(u64::from(existed)))
    }
}
