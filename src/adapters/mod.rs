// Adapters layer: concrete repositories and storage backends.

pub mod json_store;
pub mod memory;
pub mod snapshot;
pub mod storage;

pub use json_store::JsonFileStore;
pub use memory::InMemoryStore;
pub use snapshot::StoreSnapshot;
pub use storage::LocalStorage;
