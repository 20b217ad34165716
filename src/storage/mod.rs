//! Storage backends for users, portfolio content and revoked sessions

pub mod memory;
pub mod token_revocation;
pub mod traits;

pub use memory::MemoryStorageProvider;
pub use token_revocation::{
    create_memory_revocation_store, MemoryTokenRevocationStore, SharedTokenRevocationStore,
    TokenRevocationStore,
};
pub use traits::{ContentStorage, StorageProvider, UserStorage};

use std::sync::Arc;

/// Shared reference to a storage backend
pub type SharedStorage = Arc<dyn StorageProvider>;

/// Create a new memory-based storage backend
pub fn create_memory_storage() -> SharedStorage {
    Arc::new(MemoryStorageProvider::new())
}
