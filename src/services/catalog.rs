use serde::{Deserialize, Serialize};

use crate::api::dispatcher::ApiClient;
use crate::api::error::ApiError;

/// Catalog entry in the user's backlog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewCatalogItem<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
}

#[derive(Debug, Default, Serialize)]
pub struct CatalogItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    client: ApiClient,
}

impl CatalogService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.client.get("/api/v1/catalog_items").await
    }

    pub async fn create(&self, item: &NewCatalogItem<'_>) -> Result<CatalogItem, ApiError> {
        self.client.post("/api/v1/catalog_items", item).await
    }

    pub async fn update(&self, id: u64, patch: &CatalogItemPatch) -> Result<CatalogItem, ApiError> {
        self.client
            .patch(&format!("/api/v1/catalog_items/{id}"), patch)
            .await
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/api/v1/catalog_items/{id}"))
            .await
    }
}
