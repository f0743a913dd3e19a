//! Orders: owns the order collection and snapshots pet data on creation.

pub mod repository;
pub mod service;

pub use service::OrderService;
