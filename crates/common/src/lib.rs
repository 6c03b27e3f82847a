//! Identity types shared by the entity store and the saga orchestrator.

pub mod types;

pub use types::{CustomerEntity, EntityId, Identifiable};
