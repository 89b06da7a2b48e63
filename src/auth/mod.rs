pub mod refresh;
pub mod tokens;

pub use refresh::{RefreshCoordinator, RefreshError};
pub use tokens::{TokenPair, TokenStore};
