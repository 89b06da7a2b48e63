use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::dispatcher::ApiClient;
use crate::api::error::ApiError;

/// A line on the list for one shopping session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: u64,
    pub shopping_session_id: u64,
    #[serde(default)]
    pub catalog_item_id: Option<u64>,
    pub name: String,
    pub checked: bool,
}

#[derive(Clone)]
pub struct ItemService {
    client: ApiClient,
}

impl ItemService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, session_id: u64) -> Result<Vec<ShoppingItem>, ApiError> {
        self.client
            .get(&format!(
                "/api/v1/shopping_items?shopping_session_id={session_id}"
            ))
            .await
    }

    pub async fn add(
        &self,
        session_id: u64,
        name: &str,
        catalog_item_id: Option<u64>,
    ) -> Result<ShoppingItem, ApiError> {
        self.client
            .post(
                "/api/v1/shopping_items",
                &json!({
                    "shopping_session_id": session_id,
                    "name": name,
                    "catalog_item_id": catalog_item_id,
                }),
            )
            .await
    }

    pub async fn set_checked(&self, id: u64, checked: bool) -> Result<ShoppingItem, ApiError> {
        self.client
            .patch(
                &format!("/api/v1/shopping_items/{id}"),
                &json!({ "checked": checked }),
            )
            .await
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/api/v1/shopping_items/{id}"))
            .await
    }
}
