use crate::core::cache::Cache;
use crate::core::currency::{CatalogProvider, CurrencyCatalog, ProviderError};
use crate::store::memory::MemoryCache;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const CATALOG_KEY: &str = "catalog";

/// Reuses a fetched catalog until the refresh interval elapses.
///
/// Only successful fetches are kept; a failure is returned as is and the next
/// call goes upstream again.
pub struct CachingCatalogProvider<T: CatalogProvider> {
    inner: T,
    ttl: Duration,
    cache: MemoryCache<String, CurrencyCatalog>,
}

impl<T: CatalogProvider> CachingCatalogProvider<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: MemoryCache::new(),
        }
    }

    /// Drops the cached catalog so the next fetch goes upstream.
    pub async fn invalidate(&self) {
        debug!("Invalidating cached catalog");
        self.cache.clear().await;
    }
}

#[async_trait]
impl<T: CatalogProvider> CatalogProvider for CachingCatalogProvider<T> {
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, ProviderError> {
        let key = CATALOG_KEY.to_string();
        if let Some(catalog) = self.cache.get(&key).await {
            debug!("Using cached catalog from {}", catalog.date());
            return Ok(catalog);
        }

        let catalog = self.inner.fetch_catalog().await?;
        self.cache.put(key, catalog.clone(), Some(self.ttl)).await;
        Ok(catalog)
    }
}
