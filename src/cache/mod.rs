pub mod persister;

pub use persister::{CachePersister, PersistedQuery};
