//! Request dispatcher: JSON calls with bearer auth and a retry-once on 401.

use std::sync::Arc;
use std::time::Duration;

use http::Method;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::auth::refresh::RefreshCoordinator;
use crate::auth::tokens::TokenStore;
use crate::net::Connectivity;
use crate::storage::KvStorage;

/// Retry state threaded through dispatch: a request is retried at most once
/// after a refresh, and a second 401 ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retried,
}

/// HTTP client for the shopping-list API; clones share the token store,
/// the refresh coordinator and the connectivity flag.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
    refresh: RefreshCoordinator,
    connectivity: Connectivity,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout_ms: u64,
        storage: Arc<dyn KvStorage>,
        connectivity: Connectivity,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        let tokens = TokenStore::new(storage);
        let refresh = RefreshCoordinator::new(http.clone(), base_url, tokens.clone());
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tokens,
            refresh,
            connectivity,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// GET returning a typed payload. Reads are allowed while offline; they
    /// fail with a transport error if the network is genuinely down.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let payload = self.request(Method::GET, path, None).await?;
        Self::decode(payload)
    }

    /// POST a JSON body. Mutations fail fast with `Offline` while the
    /// connectivity flag is down, without issuing a network call.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.guard_online()?;
        let body = Self::encode(body)?;
        let payload = self.request(Method::POST, path, Some(body)).await?;
        Self::decode(payload)
    }

    /// PATCH a JSON body; offline-guarded like `post`.
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.guard_online()?;
        let body = Self::encode(body)?;
        let payload = self.request(Method::PATCH, path, Some(body)).await?;
        Self::decode(payload)
    }

    /// DELETE; offline-guarded like `post`.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.guard_online()?;
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Perform a call against the API, refreshing the token pair once on 401.
    ///
    /// Contract: 204 yields `None` with no parse attempt; a 2xx body that is
    /// not valid JSON yields `None`, never an error; any non-2xx other than
    /// 401 becomes `Status`; a second 401 on the retried request becomes
    /// `SessionExpired` without triggering another refresh.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = Attempt::Initial;

        loop {
            let response = self.execute(&method, &url, body.as_ref()).await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if attempt == Attempt::Retried {
                    warn!(%url, "retried request rejected again");
                    return Err(ApiError::SessionExpired);
                }
                debug!(%url, "401 received, refreshing token pair");
                self.refresh.refresh().await.map_err(|e| {
                    warn!("refresh failed: {e}");
                    ApiError::SessionExpired
                })?;
                attempt = Attempt::Retried;
                continue;
            }

            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }

            let payload = Self::parse_body(response).await;
            if status.is_success() {
                return Ok(payload);
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: payload,
            });
        }
    }

    async fn execute(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(token) = self
            .tokens
            .access_token()
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?
        {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    fn guard_online(&self) -> Result<(), ApiError> {
        if self.connectivity.is_online() {
            Ok(())
        } else {
            Err(ApiError::Offline)
        }
    }

    /// Body parse is best-effort: an empty or unparseable body yields `None`.
    async fn parse_body(response: reqwest::Response) -> Option<Value> {
        let raw = response.bytes().await.ok()?;
        if raw.is_empty() {
            return None;
        }
        serde_json::from_slice(&raw).ok()
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(payload: Option<Value>) -> Result<T, ApiError> {
        serde_json::from_value(payload.unwrap_or(Value::Null))
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
