// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::dispatcher::ApiClient;
use crate::auth::tokens::{TokenPair, TokenStore};
use crate::net::Connectivity;
use crate::storage::{KvStorage, MemoryStorage};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Client over in-memory storage; the returned store seeds and inspects tokens.
pub fn memory_client(base_url: &str) -> (ApiClient, TokenStore) {
    let storage: Arc<dyn KvStorage> = Arc::new(MemoryStorage::new());
    let store = TokenStore::new(storage.clone());
    let client =
        ApiClient::new(base_url, 5000, storage, Connectivity::new()).expect("client build");
    (client, store)
}

pub async fn seed_pair(store: &TokenStore, access: &str, refresh: &str) {
    store
        .set_pair(&TokenPair {
            access_token: access.into(),
            refresh_token: refresh.into(),
        })
        .await
        .expect("seed tokens");
}
