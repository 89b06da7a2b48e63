//! Single-flight refresh of the access/refresh token pair.
//!
//! At most one refresh call is outstanding at any time. A caller that hits
//! a 401 while a refresh is already in flight awaits the same shared future
//! and observes its outcome instead of issuing a second call.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::tokens::{TokenPair, TokenStore};
use crate::utils::constants::REFRESH_PATH;

/// Outcome shared by every waiter of the same refresh; must be cheap to clone.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// No complete token pair was stored; no network call was made.
    #[error("no token pair available")]
    MissingTokens,
    /// The refresh endpoint answered non-2xx.
    #[error("refresh rejected with status {0}")]
    Rejected(u16),
    /// Network failure or malformed refresh response.
    #[error("refresh transport failure: {0}")]
    Transport(String),
    /// The injected token storage failed.
    #[error("token storage failure: {0}")]
    Storage(String),
}

type SharedRefresh = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

/// `Idle -> Refreshing -> Idle`; the slot below is `Some` exactly while a
/// refresh is in flight and is reset when it settles, success or failure.
#[derive(Clone)]
pub struct RefreshCoordinator {
    http: Client,
    refresh_url: String,
    store: TokenStore,
    in_flight: Arc<Mutex<Option<SharedRefresh>>>,
}

impl RefreshCoordinator {
    pub fn new(http: Client, base_url: &str, store: TokenStore) -> Self {
        Self {
            http,
            refresh_url: format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH),
            store,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Join the in-flight refresh, or start one if the coordinator is idle.
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        let shared = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let fut = Self::run(
                        self.http.clone(),
                        self.refresh_url.clone(),
                        self.store.clone(),
                        self.in_flight.clone(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        shared.await
    }

    async fn run(
        http: Client,
        url: String,
        store: TokenStore,
        slot: Arc<Mutex<Option<SharedRefresh>>>,
    ) -> Result<(), RefreshError> {
        let outcome = Self::execute(http, url, store).await;
        // back to idle regardless of outcome
        *slot.lock().await = None;
        outcome
    }

    async fn execute(http: Client, url: String, store: TokenStore) -> Result<(), RefreshError> {
        let storage_err = |e: anyhow::Error| RefreshError::Storage(e.to_string());

        let access = store.access_token().await.map_err(storage_err)?;
        let refresh = store.refresh_token().await.map_err(storage_err)?;
        let (access, refresh) = match (access, refresh) {
            (Some(a), Some(r)) => (a, r),
            _ => {
                store.clear().await.map_err(storage_err)?;
                debug!("refresh skipped: token pair incomplete");
                return Err(RefreshError::MissingTokens);
            }
        };

        let result = http
            .post(&url)
            .bearer_auth(&access)
            .json(&json!({ "refresh_token": refresh }))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<TokenPair>().await {
                Ok(pair) => {
                    store.set_pair(&pair).await.map_err(storage_err)?;
                    debug!("token pair refreshed");
                    Ok(())
                }
                Err(e) => {
                    store.clear().await.map_err(storage_err)?;
                    warn!("refresh response malformed: {e}");
                    Err(RefreshError::Transport(e.to_string()))
                }
            },
            Ok(resp) => {
                let status = resp.status().as_u16();
                store.clear().await.map_err(storage_err)?;
                warn!("refresh rejected with status {status}");
                Err(RefreshError::Rejected(status))
            }
            Err(e) => {
                store.clear().await.map_err(storage_err)?;
                warn!("refresh transport failure: {e}");
                Err(RefreshError::Transport(e.to_string()))
            }
        }
    }
}
