//! Service layer for the pet shop.
//! - `pet` / `order` hold the business rules (validation, denormalization).
//! - Repositories abstract over Postgres (SeaORM) and JSON document storage.
//! - `storage::Storage` is built once at startup and handed to the services.

pub mod errors;
pub mod storage;
pub mod pet;
pub mod order;
#[cfg(test)]
pub mod test_support;

/// Record ids are UUIDs; anything else cannot match a stored record.
pub(crate) fn parse_id(raw: &str) -> Option<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim()).ok()
}
