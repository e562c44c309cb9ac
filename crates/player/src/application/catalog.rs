//! Spell catalog cache.
//!
//! The catalog is fetched at most once per process and memoized for the
//! session; a failed fetch memoizes an empty catalog (lookups just miss)
//! rather than erroring, since the combo boxes degrade gracefully
//! without it. `reload` drops the memo and refetches.

use std::sync::Arc;

use tokio::sync::RwLock;

use vellum_shared::{unwrap_list, SpellSummary};

use crate::ports::HttpPort;

const SPELLS_PATH: &str = "/api/spells/";

#[derive(Clone)]
pub struct SpellCatalog {
    api: Arc<dyn HttpPort>,
    cache: Arc<RwLock<Option<Arc<Vec<SpellSummary>>>>>,
}

impl SpellCatalog {
    pub fn new(api: Arc<dyn HttpPort>) -> Self {
        Self {
            api,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// The cached catalog, fetching it on first use.
    pub async fn ensure_loaded(&self) -> Arc<Vec<SpellSummary>> {
        if let Some(cached) = self.cache.read().await.clone() {
            return cached;
        }
        self.fetch_into_cache().await
    }

    /// Drop the memo and refetch.
    pub async fn reload(&self) -> Arc<Vec<SpellSummary>> {
        self.cache.write().await.take();
        self.fetch_into_cache().await
    }

    async fn fetch_into_cache(&self) -> Arc<Vec<SpellSummary>> {
        let spells = match self.api.get_json(SPELLS_PATH).await {
            Ok(value) => unwrap_list::<SpellSummary>(value),
            Err(e) => {
                tracing::warn!("spell catalog fetch failed: {e}");
                Vec::new()
            }
        };
        let spells = Arc::new(spells);
        let mut cache = self.cache.write().await;
        // A concurrent load may have won the race; keep whichever landed.
        if let Some(existing) = cache.clone() {
            return existing;
        }
        *cache = Some(Arc::clone(&spells));
        spells
    }

    /// Look a value up by exact slug, then by case-insensitive name.
    pub async fn find_by_slug_or_name(&self, value: &str) -> Option<SpellSummary> {
        if value.is_empty() {
            return None;
        }
        let spells = self.ensure_loaded().await;
        if let Some(spell) = spells.iter().find(|s| s.slug == value) {
            return Some(spell.clone());
        }
        spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(value))
            .cloned()
    }

    /// Catalog entries whose name or slug contains the filter
    /// (case-insensitive); the whole catalog for an empty filter.
    pub async fn filtered(&self, filter: &str) -> Vec<SpellSummary> {
        let spells = self.ensure_loaded().await;
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return spells.as_ref().clone();
        }
        spells
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.slug.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{json, Value};

    use crate::ports::{ApiError, UploadPart};

    struct CountingApi {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl HttpPort for CountingApi {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Network("offline".to_string()));
            }
            Ok(json!([
                {"slug": "fire-bolt", "name": "Fire Bolt"},
                {"slug": "mage-armor", "name": "Mage Armor"},
            ]))
        }

        async fn post_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!("catalog never posts")
        }

        async fn patch_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!("catalog never patches")
        }

        async fn delete(&self, _: &str) -> Result<(), ApiError> {
            unreachable!("catalog never deletes")
        }

        async fn post_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!("catalog never uploads")
        }

        async fn patch_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!("catalog never uploads")
        }
    }

    fn catalog(fail: bool) -> (SpellCatalog, Arc<CountingApi>) {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
            fail,
        });
        (SpellCatalog::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_fetches_once() {
        let (catalog, api) = catalog(false);
        assert_eq!(catalog.ensure_loaded().await.len(), 2);
        assert_eq!(catalog.ensure_loaded().await.len(), 2);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_memoizes_empty() {
        let (catalog, api) = catalog(true);
        assert!(catalog.ensure_loaded().await.is_empty());
        assert!(catalog.ensure_loaded().await.is_empty());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reload_refetches() {
        let (catalog, api) = catalog(false);
        catalog.ensure_loaded().await;
        catalog.reload().await;
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_by_slug_then_name() {
        let (catalog, _) = catalog(false);
        let by_slug = catalog.find_by_slug_or_name("fire-bolt").await.unwrap();
        assert_eq!(by_slug.name, "Fire Bolt");
        let by_name = catalog.find_by_slug_or_name("mage armor").await.unwrap();
        assert_eq!(by_name.slug, "mage-armor");
        // partial names are not a match
        assert!(catalog.find_by_slug_or_name("mage").await.is_none());
    }

    #[tokio::test]
    async fn test_filtered() {
        let (catalog, _) = catalog(false);
        assert_eq!(catalog.filtered("bolt").await.len(), 1);
        assert_eq!(catalog.filtered("").await.len(), 2);
        assert!(catalog.filtered("wish").await.is_empty());
    }
}
