//! Storage backends for the service layer.
//!
//! [`Storage`] bundles one repository per collection. It is built once per
//! process from [`configs::DatabaseConfig`] and cloned into each service.

pub mod json_map_store;

use std::path::Path;
use std::sync::Arc;

use configs::{DatabaseConfig, StorageBackend};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::order::repository::{DocumentOrderRepository, OrderRepository, SeaOrmOrderRepository};
use crate::pet::repository::{DocumentPetRepository, PetRepository, SeaOrmPetRepository};
use json_map_store::JsonMapStore;

#[derive(Clone)]
pub struct Storage {
    pub pets: Arc<dyn PetRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Storage {
    /// Open whatever backend `cfg.url` points at.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        match cfg.backend()? {
            StorageBackend::Postgres(_) => {
                let db = models::db::connect_and_prepare(cfg).await?;
                info!(backend = "postgres", "storage ready");
                Ok(Self::postgres(db))
            }
            StorageBackend::File(dir) => {
                let storage = Self::file(&dir).await?;
                info!(backend = "file", dir = %dir.display(), "storage ready");
                Ok(storage)
            }
            StorageBackend::Memory => {
                info!(backend = "memory", "storage ready; data is not persisted");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            pets: Arc::new(SeaOrmPetRepository { db: db.clone() }),
            orders: Arc::new(SeaOrmOrderRepository { db }),
        }
    }

    /// One JSON file per collection under `dir`.
    pub async fn file(dir: &Path) -> anyhow::Result<Self> {
        common::env::ensure_data_dir(dir).await?;
        let pets = JsonMapStore::new(dir.join("pets.json")).await?;
        let orders = JsonMapStore::new(dir.join("orders.json")).await?;
        Ok(Self {
            pets: Arc::new(DocumentPetRepository::new(pets)),
            orders: Arc::new(DocumentOrderRepository::new(orders)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            pets: Arc::new(DocumentPetRepository::new(JsonMapStore::in_memory())),
            orders: Arc::new(DocumentOrderRepository::new(JsonMapStore::in_memory())),
        }
    }
}
