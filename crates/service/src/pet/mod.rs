//! Pet catalog: owns the pet collection.

pub mod repository;
pub mod service;

pub use service::PetService;
