//! Record types for the pet shop: SeaORM entities for the Postgres backend,
//! the JSON documents served over HTTP, and the input/patch shapes with their
//! validation rules.

pub mod errors;
pub mod db;
pub mod document;
pub mod results;
pub mod pet;
pub mod order;
