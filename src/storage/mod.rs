/// Storage module
///
/// Injected key-value storage backing the token store and the query-cache
/// persister. Swapping the backend (in-memory, file, OS keychain) never
/// touches the components above it.
use anyhow::Result;
use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key-value storage capability. Implementations must tolerate concurrent
/// readers and writers from the runtime's worker threads.
#[async_trait]
pub trait KvStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
