//! Catalog orchestration: dispatch, caching, and response assembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::tmdb::{CollectionId, MetadataClient};

use super::discover::CollectionDiscovery;
use super::kind::{CatalogExtra, CatalogKind};
use super::params::{discover_params, SortKey};
use super::resolver::ResolveCollections;
use super::search::collection_search;
use super::summary::{resolve_summaries, sort_summaries, CollectionSummary};
use super::tables;

/// Distinct collections a discovery catalog aims for.
const TARGET_COLLECTIONS: usize = 20;

/// Deepest discovery page any catalog will fetch.
const MAX_DISCOVER_PAGE: u32 = 10;

/// A catalog response body: sorted collection summaries.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<CollectionSummary>,
}

/// Catalog request orchestrator.
///
/// Dispatches per catalog kind (curated list, free-text search, or paged
/// discovery) and assembles the sorted response. Discovery results and
/// sorted catalogs are cached per parameter set; search results per query.
/// Every failure below this point has already been downgraded to an empty
/// result, so a catalog request itself cannot fail.
pub struct CatalogService {
    client: Arc<dyn MetadataClient>,
    resolver: Arc<dyn ResolveCollections>,
    discovery: CollectionDiscovery,
    discover_cache: Cache<Vec<CollectionId>>,
    search_cache: Cache<Vec<CollectionId>>,
    catalog_cache: Cache<Vec<CollectionSummary>>,
}

impl CatalogService {
    pub fn new(
        client: Arc<dyn MetadataClient>,
        resolver: Arc<dyn ResolveCollections>,
        cache_config: &CacheConfig,
    ) -> Self {
        let catalog_ttl = Duration::from_secs(cache_config.catalog_ttl_secs);
        Self {
            discovery: CollectionDiscovery::new(client.clone(), resolver.clone()),
            client,
            resolver,
            discover_cache: Cache::new(catalog_ttl),
            search_cache: Cache::new(Duration::from_secs(cache_config.search_ttl_secs)),
            catalog_cache: Cache::new(catalog_ttl),
        }
    }

    /// Serve one catalog request.
    pub async fn get_catalog(&self, kind: CatalogKind, extra: &CatalogExtra) -> CatalogResponse {
        let started = Instant::now();
        let metas = self.build_catalog(kind, extra).await;
        info!(
            catalog = %kind,
            metas = metas.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog request served"
        );
        CatalogResponse { metas }
    }

    async fn build_catalog(&self, kind: CatalogKind, extra: &CatalogExtra) -> Vec<CollectionSummary> {
        // Catalogs are served as a single window, so any skip offset is past
        // the end of what exists.
        if extra.skip.is_some() {
            debug!(catalog = %kind, "skip requested, returning empty page");
            return Vec::new();
        }

        if kind == CatalogKind::DisneyPrincess {
            return self.curated_catalog().await;
        }

        if let Some(query) = extra.search.as_deref() {
            return self.search_catalog(query).await;
        }

        self.discovery_catalog(kind, extra.genre.as_deref()).await
    }

    /// Fixed collection list plus the parent collections of the curated
    /// movies. Small enough to resolve fresh on every request; the resolver's
    /// own memoization absorbs the per-movie lookups.
    async fn curated_catalog(&self) -> Vec<CollectionSummary> {
        let mut ids: std::collections::HashSet<CollectionId> =
            tables::DISNEY_PRINCESS_COLLECTIONS.iter().copied().collect();
        ids.extend(
            self.resolver
                .collection_ids(tables::DISNEY_PRINCESS_MOVIES)
                .await,
        );

        let mut summaries = resolve_summaries(self.client.as_ref(), ids).await;
        sort_summaries(&mut summaries, SortKey::Popularity);
        summaries
    }

    async fn search_catalog(&self, query: &str) -> Vec<CollectionSummary> {
        let ids = self
            .search_cache
            .wrap(query, || async {
                let mut ids: Vec<CollectionId> =
                    collection_search(self.client.as_ref(), self.resolver.as_ref(), query)
                        .await
                        .into_iter()
                        .collect();
                ids.sort_unstable();
                ids
            })
            .await;

        let mut summaries = resolve_summaries(self.client.as_ref(), ids).await;
        sort_summaries(&mut summaries, SortKey::Popularity);
        summaries
    }

    async fn discovery_catalog(
        &self,
        kind: CatalogKind,
        genre: Option<&str>,
    ) -> Vec<CollectionSummary> {
        let (params, sort_key) = discover_params(kind, genre);
        let key = format!("{kind}|{}", params.cache_key());

        self.catalog_cache
            .wrap(&key, || async {
                let ids = self
                    .discover_cache
                    .wrap(&key, || async {
                        let (ids, outcome) = self
                            .discovery
                            .discover_until(&params, TARGET_COLLECTIONS, MAX_DISCOVER_PAGE)
                            .await;
                        info!(catalog = %kind, collections = ids.len(), outcome = ?outcome, "discovery complete");
                        let mut ids: Vec<CollectionId> = ids.into_iter().collect();
                        ids.sort_unstable();
                        ids
                    })
                    .await;

                let mut summaries = resolve_summaries(self.client.as_ref(), ids).await;
                sort_summaries(&mut summaries, sort_key);
                summaries
            })
            .await
    }
}
