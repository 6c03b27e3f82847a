pub mod error;
pub mod memory;
pub mod store;

pub use common::{EntityId, Identifiable};
pub use error::{Result, StoreError};
pub use memory::InMemoryEntityStore;
pub use store::EntityStore;
