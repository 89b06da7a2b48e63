use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::dispatcher::ApiClient;
use crate::api::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

/// A shopping trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingSession {
    pub id: u64,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct SessionService {
    client: ApiClient,
}

impl SessionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Past and present sessions, newest first per the backend ordering.
    pub async fn list(&self) -> Result<Vec<ShoppingSession>, ApiError> {
        self.client.get("/api/v1/shopping_sessions").await
    }

    pub async fn start(&self) -> Result<ShoppingSession, ApiError> {
        self.client
            .post("/api/v1/shopping_sessions", &json!({}))
            .await
    }

    /// The active session, or `None` when the backend reports no current trip.
    pub async fn current(&self) -> Result<Option<ShoppingSession>, ApiError> {
        match self.client.get("/api/v1/shopping_sessions/current").await {
            Ok(session) => Ok(Some(session)),
            Err(ApiError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn complete(&self, id: u64) -> Result<ShoppingSession, ApiError> {
        self.set_status(id, SessionStatus::Completed).await
    }

    pub async fn cancel(&self, id: u64) -> Result<ShoppingSession, ApiError> {
        self.set_status(id, SessionStatus::Cancelled).await
    }

    async fn set_status(&self, id: u64, status: SessionStatus) -> Result<ShoppingSession, ApiError> {
        self.client
            .patch(
                &format!("/api/v1/shopping_sessions/{id}"),
                &json!({ "status": status }),
            )
            .await
    }
}
