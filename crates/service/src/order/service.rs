use std::sync::Arc;

use chrono::Utc;
use models::order::{NewOrder, Order, OrderFilter, OrderPatch};
use models::results::{DeleteResult, InsertResult, UpdateResult};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;
use crate::parse_id;
use crate::pet::repository::PetRepository;
use crate::pet::PetService;

pub const INVALID_PRODUCT_MESSAGE: &str = "Invalid productId";

/// Application service for orders.
/// Resolves the referenced pet through [`PetService`] and snapshots its name
/// and price; the lookup and the insert are not transactional.
pub struct OrderService<O: OrderRepository + ?Sized = dyn OrderRepository, P: PetRepository + ?Sized = dyn PetRepository> {
    repo: Arc<O>,
    pets: PetService<P>,
}

impl<O: OrderRepository + ?Sized, P: PetRepository + ?Sized> Clone for OrderService<O, P> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo), pets: self.pets.clone() } }
}

impl<O: OrderRepository + ?Sized, P: PetRepository + ?Sized> OrderService<O, P> {
    pub fn new(repo: Arc<O>, pets: PetService<P>) -> Self { Self { repo, pets } }

    #[instrument(skip_all)]
    pub async fn create(&self, input: NewOrder) -> Result<InsertResult, ServiceError> {
        let draft = input.into_draft()?;
        let Some(product_id) = draft.product_id() else {
            warn!(product_ref = %draft.product_ref, "order references malformed productId");
            return Err(ServiceError::InvalidReference(INVALID_PRODUCT_MESSAGE.into()));
        };
        let Some(pet) = self.pets.find(product_id).await? else {
            warn!(%product_id, "order references unknown pet");
            return Err(ServiceError::InvalidReference(INVALID_PRODUCT_MESSAGE.into()));
        };
        let order = draft.snapshot(&pet, Utc::now());
        self.repo.insert(&order).await?;
        info!(id = %order.id, %product_id, quantity = order.quantity, price = order.price, "order created");
        Ok(InsertResult::new(order.id))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, ServiceError> {
        let orders = self.repo.list(&filter.normalized()).await?;
        info!(count = orders.len(), "list orders");
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Order, ServiceError> {
        let found = match parse_id(id) {
            Some(id) => self.repo.get(id).await?,
            None => None,
        };
        found.ok_or_else(|| ServiceError::not_found("Order"))
    }

    /// `productId` may be overwritten here without re-validation.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: OrderPatch) -> Result<UpdateResult, ServiceError> {
        let Some(id) = parse_id(id) else { return Ok(UpdateResult::unmatched()) };
        let res = self.repo.update(id, &patch).await?;
        info!(%id, matched = res.matched_count, modified = res.modified_count, "updated order");
        Ok(res)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<DeleteResult, ServiceError> {
        let Some(id) = parse_id(id) else { return Ok(DeleteResult::new(0)) };
        let res = self.repo.delete(id).await?;
        info!(%id, deleted = res.deleted_count, "deleted order");
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_storage;
    use models::pet::NewPet;
    use serde_json::{json, Value};
    use uuid::Uuid;

    struct Fixture {
        pets: PetService,
        orders: OrderService,
    }

    fn fixture() -> Fixture {
        let storage = memory_storage();
        let pets = PetService::new(storage.pets.clone());
        let orders = OrderService::new(storage.orders.clone(), pets.clone());
        Fixture { pets, orders }
    }

    async fn add_pet(f: &Fixture, body: Value) -> Uuid {
        f.pets.create(NewPet::from_json(body).unwrap()).await.unwrap().inserted_id
    }

    fn new_order(body: Value) -> NewOrder { NewOrder::from_json(body).unwrap() }

    #[tokio::test]
    async fn create_snapshots_pet_name_and_price() -> anyhow::Result<()> {
        let f = fixture();
        let pet_id = add_pet(&f, json!({ "name": "Rex", "category": "dog", "price": 300 })).await;

        let res = f.orders.create(new_order(json!({ "productId": pet_id.to_string(), "buyerName": "Ann" }))).await?;
        let order = f.orders.get(&res.inserted_id.to_string()).await?;
        assert_eq!(order.product_id, pet_id);
        assert_eq!(order.product_name, "Rex");
        assert_eq!(order.price, 300.0);
        assert_eq!(order.quantity, 1);
        assert_eq!(order.address, "");

        // later pet edits do not flow into the order
        f.pets.update(&pet_id.to_string(), models::pet::PetPatch::from_json(json!({ "name": "Max", "price": 1 }))?).await?;
        let order = f.orders.get(&res.inserted_id.to_string()).await?;
        assert_eq!(order.product_name, "Rex");
        assert_eq!(order.price, 300.0);
        Ok(())
    }

    #[tokio::test]
    async fn supplied_price_is_kept() -> anyhow::Result<()> {
        let f = fixture();
        let pet_id = add_pet(&f, json!({ "name": "Rex", "category": "dog", "price": 300 })).await;
        let res = f
            .orders
            .create(new_order(json!({ "productId": pet_id.to_string(), "buyerName": "Ann", "price": 250, "quantity": 2 })))
            .await?;
        let order = f.orders.get(&res.inserted_id.to_string()).await?;
        assert_eq!(order.price, 250.0);
        assert_eq!(order.quantity, 2);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_invalid_reference_and_persists_nothing() -> anyhow::Result<()> {
        let f = fixture();
        for product in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let err = f
                .orders
                .create(new_order(json!({ "productId": product, "buyerName": "Ann" })))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidReference(_)));
            assert_eq!(err.message(), INVALID_PRODUCT_MESSAGE);
        }
        assert!(f.orders.list(OrderFilter::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_required_fields_fail_before_lookup() {
        let f = fixture();
        let err = f.orders.create(new_order(json!({ "buyerName": "Ann" }))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        assert_eq!(err.message(), "productId & buyerName are required");
    }

    #[tokio::test]
    async fn list_filters_on_order_email_not_owner_email() -> anyhow::Result<()> {
        let f = fixture();
        let pet_id = add_pet(&f, json!({ "name": "Rex", "category": "dog", "owner_email": "seller@x.io" })).await;
        for (buyer, email) in [("Ann", "ann@x.io"), ("Bob", "bob@x.io")] {
            f.orders
                .create(new_order(json!({ "productId": pet_id.to_string(), "buyerName": buyer, "email": email })))
                .await?;
        }
        let anns = f.orders.list(OrderFilter { email: Some("ann@x.io".into()) }).await?;
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].buyer_name, "Ann");
        assert!(f.orders.list(OrderFilter { email: Some("seller@x.io".into()) }).await?.is_empty());
        assert_eq!(f.orders.list(OrderFilter::default()).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_pet_leaves_orders() -> anyhow::Result<()> {
        let f = fixture();
        let pet_id = add_pet(&f, json!({ "name": "Rex", "category": "dog" })).await;
        let res = f.orders.create(new_order(json!({ "productId": pet_id.to_string(), "buyerName": "Ann" }))).await?;
        assert_eq!(f.pets.delete(&pet_id.to_string()).await?.deleted_count, 1);
        let order = f.orders.get(&res.inserted_id.to_string()).await?;
        assert_eq!(order.product_id, pet_id);
        Ok(())
    }

    #[tokio::test]
    async fn update_get_delete_contract() -> anyhow::Result<()> {
        let f = fixture();
        let pet_id = add_pet(&f, json!({ "name": "Rex", "category": "dog", "price": 5 })).await;
        let id = f
            .orders
            .create(new_order(json!({ "productId": pet_id.to_string(), "buyerName": "Ann" })))
            .await?
            .inserted_id
            .to_string();

        let res = f.orders.update(&id, OrderPatch::from_json(json!({ "address": "1 Main St" }))?).await?;
        assert_eq!((res.matched_count, res.modified_count), (1, 1));
        let order = f.orders.get(&id).await?;
        assert_eq!(order.address, "1 Main St");
        assert_eq!(order.buyer_name, "Ann");

        let missing = Uuid::new_v4().to_string();
        assert_eq!(f.orders.update(&missing, OrderPatch::default()).await?, UpdateResult::unmatched());
        assert!(matches!(f.orders.get(&missing).await, Err(ServiceError::NotFound(ref m)) if m == "Order not found"));

        assert_eq!(f.orders.delete(&id).await?.deleted_count, 1);
        assert_eq!(f.orders.delete(&id).await?.deleted_count, 0);
        Ok(())
    }
}
