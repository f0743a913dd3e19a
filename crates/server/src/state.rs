use service::order::OrderService;
use service::pet::PetService;
use service::storage::Storage;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pets: PetService,
    pub orders: OrderService,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        let pets = PetService::new(storage.pets);
        let orders = OrderService::new(storage.orders, pets.clone());
        Self { pets, orders }
    }
}
