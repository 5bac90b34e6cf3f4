//! Branding service
//!
//! The branding document (leader name, images, slogan, CTAs) is a
//! singleton owned by the store. This service is a read-through/
//! write-through cache over it with an explicit dirty flag: `load` pulls
//! unless a local edit is pending, `save` pushes and clears the flag.
//! A remote value never silently overwrites an edit in progress.

use crate::config::BRANDING_PATH;
use crate::error::Result;
use crate::store::{BrandingConfig, DocumentStore};
use std::sync::Arc;
use tokio::sync::Mutex;

struct BrandingCache {
    config: BrandingConfig,
    dirty: bool,
}

#[derive(Clone)]
pub struct BrandingService {
    store: DocumentStore,
    cache: Arc<Mutex<BrandingCache>>,
}

impl BrandingService {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            cache: Arc::new(Mutex::new(BrandingCache {
                config: BrandingConfig::default(),
                dirty: false,
            })),
        }
    }

    /// Pull the remote document into the cache and return it.
    ///
    /// If a local edit is pending (dirty), the remote value is NOT
    /// applied and the pending edit is returned instead.
    pub async fn load(&self) -> Result<BrandingConfig> {
        let mut cache = self.cache.lock().await;

        if cache.dirty {
            tracing::debug!("Branding load skipped remote: local edit pending");
            return Ok(cache.config.clone());
        }

        if let Some(value) = self.store.read(BRANDING_PATH).await? {
            cache.config = serde_json::from_value(value)?;
        }
        Ok(cache.config.clone())
    }

    /// Apply a local edit without persisting it
    pub async fn edit(&self, config: BrandingConfig) {
        let mut cache = self.cache.lock().await;
        cache.config = config;
        cache.dirty = true;
    }

    /// Push the cached value to the store and clear the dirty flag
    pub async fn save(&self) -> Result<BrandingConfig> {
        let mut cache = self.cache.lock().await;

        self.store
            .set(BRANDING_PATH, &serde_json::to_value(&cache.config)?)
            .await?;
        cache.dirty = false;

        tracing::info!("Branding saved");
        Ok(cache.config.clone())
    }

    pub async fn is_dirty(&self) -> bool {
        self.cache.lock().await.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::initialize_store;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> (BrandingService, DocumentStore) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_store(&pool).await.unwrap();

        let store = DocumentStore::new(pool);
        (BrandingService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_load_pulls_remote_value() {
        let (service, store) = create_test_service().await;

        store
            .set(
                "config/branding",
                &json!({"leaderName": "A. B. Patil", "slogan": "Forward Together"}),
            )
            .await
            .unwrap();

        let branding = service.load().await.unwrap();
        assert_eq!(branding.leader_name, "A. B. Patil");
        assert_eq!(branding.slogan, "Forward Together");
    }

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let (service, _store) = create_test_service().await;

        let branding = service.load().await.unwrap();
        assert_eq!(branding, BrandingConfig::default());
    }

    #[tokio::test]
    async fn test_remote_does_not_clobber_dirty_edit() {
        let (service, store) = create_test_service().await;

        service
            .edit(BrandingConfig {
                slogan: "Local edit".to_string(),
                ..Default::default()
            })
            .await;
        assert!(service.is_dirty().await);

        // A remote write lands while the edit is pending
        store
            .set("config/branding", &json!({"slogan": "Remote value"}))
            .await
            .unwrap();

        let branding = service.load().await.unwrap();
        assert_eq!(branding.slogan, "Local edit");
    }

    #[tokio::test]
    async fn test_save_pushes_and_clears_dirty() {
        let (service, store) = create_test_service().await;

        service
            .edit(BrandingConfig {
                slogan: "Vote Sunday".to_string(),
                ..Default::default()
            })
            .await;
        service.save().await.unwrap();

        assert!(!service.is_dirty().await);

        let stored = store.read("config/branding").await.unwrap().unwrap();
        assert_eq!(stored["slogan"], "Vote Sunday");

        // After save, remote values flow through load again
        store
            .set("config/branding", &json!({"slogan": "Remote value"}))
            .await
            .unwrap();
        let branding = service.load().await.unwrap();
        assert_eq!(branding.slogan, "Remote value");
    }
}
