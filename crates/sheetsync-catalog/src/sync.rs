//! Cache → fetch → parse → normalize, as one `sync` call.
//!
//! [`SyncOrchestrator`] owns the two pieces of mutable state in the pipeline:
//! the cache slot and the current catalog. It is driven by one caller at a
//! time (`&mut self`); a host that resyncs on a timer wraps it in a mutex so
//! overlapping ticks queue instead of racing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sheetsync_core::{AppConfig, Catalog, ProductRecord};

use crate::cache::ResultCache;
use crate::csv::parse_csv;
use crate::error::FetchError;
use crate::fetch::SourceFetcher;
use crate::normalize::FieldNormalizer;

/// Where the catalog returned by the last [`SyncOrchestrator::sync`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Served from a fresh cache entry; no network I/O.
    Cache,
    /// Built from a document fetched during this call.
    Network,
    /// Every strategy failed; the previous catalog was kept.
    Stale,
    /// A document arrived but held no valid rows; the previous, non-empty
    /// catalog was kept.
    EmptyDocument,
}

pub struct SyncOrchestrator {
    fetcher: SourceFetcher,
    normalizer: FieldNormalizer,
    cache: ResultCache,
    catalog: Catalog,
    /// Cache generation the current catalog was built from.
    catalog_generation: Option<u64>,
    last_outcome: Option<SyncOutcome>,
}

impl SyncOrchestrator {
    #[must_use]
    pub fn new(fetcher: SourceFetcher, normalizer: FieldNormalizer, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            normalizer,
            cache: ResultCache::new(cache_ttl),
            catalog: Catalog::default(),
            catalog_generation: None,
            last_outcome: None,
        }
    }

    /// Builds the orchestrator from application configuration with the
    /// default sheet columns and image hosts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = SourceFetcher::from_config(config)?;
        Ok(Self::new(
            fetcher,
            FieldNormalizer::default(),
            config.cache_duration(),
        ))
    }

    /// Installs `catalog` as the last-known-good catalog, e.g. a seed file
    /// loaded at startup.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self.catalog_generation = None;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome
    }

    /// Returns the current catalog, refreshing it first when the cache has
    /// gone stale.
    ///
    /// Never fails: when no strategy can reach the document the previous
    /// catalog is returned unchanged. Two calls inside the freshness window
    /// return equal catalogs and the second performs no network I/O.
    pub async fn sync(&mut self) -> Catalog {
        if let Some(entry) = self.cache.entry().filter(|_| self.cache.is_fresh()) {
            let generation = entry.generation();
            if self.catalog_generation == Some(generation) {
                tracing::debug!(products = self.catalog.len(), "serving catalog from cache");
                return self.finish(SyncOutcome::Cache);
            }
            let fetched_at = entry.fetched_at;
            let products = self.normalizer.normalize_all(&parse_csv(&entry.raw_payload));
            let outcome = self.replace_catalog(products, generation, fetched_at, SyncOutcome::Cache);
            return self.finish(outcome);
        }

        let body = self
            .fetcher
            .fetch_raw()
            .await
            .filter(|b| !b.trim().is_empty());

        let Some(body) = body else {
            tracing::warn!(
                products = self.catalog.len(),
                "no fresh document; keeping last known catalog"
            );
            return self.finish(SyncOutcome::Stale);
        };

        let products = self.normalizer.normalize_all(&parse_csv(&body));
        self.cache.put(body);
        let (generation, fetched_at) = match self.cache.entry() {
            Some(entry) => (entry.generation(), entry.fetched_at),
            None => return self.finish(SyncOutcome::Stale),
        };
        let outcome = self.replace_catalog(products, generation, fetched_at, SyncOutcome::Network);
        self.finish(outcome)
    }

    /// Drops the cached document and syncs from the network.
    pub async fn refresh(&mut self) -> Catalog {
        self.cache.invalidate();
        self.sync().await
    }

    /// Swaps in a freshly built product list. An empty list never replaces a
    /// non-empty catalog.
    fn replace_catalog(
        &mut self,
        products: Vec<ProductRecord>,
        generation: u64,
        fetched_at: DateTime<Utc>,
        source: SyncOutcome,
    ) -> SyncOutcome {
        self.catalog_generation = Some(generation);

        if products.is_empty() && !self.catalog.is_empty() {
            tracing::warn!(
                products = self.catalog.len(),
                "document has no valid rows; keeping last known catalog"
            );
            return SyncOutcome::EmptyDocument;
        }

        tracing::info!(products = products.len(), ?source, "catalog updated");
        self.catalog = Catalog::new(products, Some(fetched_at));
        source
    }

    fn finish(&mut self, outcome: SyncOutcome) -> Catalog {
        self.last_outcome = Some(outcome);
        self.catalog.clone()
    }
}
