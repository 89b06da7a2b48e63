use serde_json::json;
use tracing::debug;

use crate::api::dispatcher::ApiClient;
use crate::api::error::ApiError;
use crate::auth::tokens::TokenPair;
use crate::utils::constants::{LOGIN_PATH, LOGOUT_PATH};

/// Login/logout flow. The token store is written only on a successful login
/// and always cleared on logout, whether or not the backend call went through.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let pair: TokenPair = self
            .client
            .post(LOGIN_PATH, &json!({ "email": email, "password": password }))
            .await?;
        self.client
            .tokens()
            .set_pair(&pair)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        debug!("logged in");
        Ok(())
    }

    /// Best-effort server-side logout; local tokens are cleared regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self.client.post::<_, ()>(LOGOUT_PATH, &json!({})).await {
            debug!("logout call failed, clearing local tokens anyway: {e}");
        }
        self.client
            .tokens()
            .clear()
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    pub async fn is_logged_in(&self) -> Result<bool, ApiError> {
        self.client
            .tokens()
            .has_valid_pair()
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }
}
