use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::storage::KvStorage;
use crate::utils::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Access/refresh token pair as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Sole owner of the persisted token pair. Written by login and refresh,
/// cleared by logout and failed refresh; nothing else touches the keys.
///
/// Invariant: a pair is valid for authenticated use only when both values
/// are present and non-empty.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KvStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KvStorage>) -> Self {
        Self { storage }
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(ACCESS_TOKEN_KEY)
            .await?
            .filter(|v| !v.is_empty()))
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|v| !v.is_empty()))
    }

    pub async fn set_pair(&self, pair: &TokenPair) -> Result<()> {
        self.storage.set(ACCESS_TOKEN_KEY, &pair.access_token).await?;
        self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(ACCESS_TOKEN_KEY).await?;
        self.storage.remove(REFRESH_TOKEN_KEY).await?;
        Ok(())
    }

    pub async fn has_valid_pair(&self) -> Result<bool> {
        Ok(self.access_token().await?.is_some() && self.refresh_token().await?.is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> TokenStore {
        TokenStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn empty_store_has_no_valid_pair() {
        let store = store();
        assert!(!store.has_valid_pair().await.unwrap());
        assert!(store.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_clear() {
        let store = store();
        store
            .set_pair(&TokenPair {
                access_token: "A1".into(),
                refresh_token: "R1".into(),
            })
            .await
            .unwrap();
        assert!(store.has_valid_pair().await.unwrap());
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("A1"));

        store.clear().await.unwrap();
        assert!(!store.has_valid_pair().await.unwrap());
    }

    #[tokio::test]
    async fn empty_string_token_is_not_valid() {
        let store = store();
        store
            .set_pair(&TokenPair {
                access_token: "".into(),
                refresh_token: "R1".into(),
            })
            .await
            .unwrap();
        assert!(!store.has_valid_pair().await.unwrap());
    }
}
