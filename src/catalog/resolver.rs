//! Batched movie → parent-collection resolution.
//!
//! TMDB exposes a movie's parent collection only on the per-movie detail
//! endpoint, so resolving a discovery page costs one lookup per movie. The
//! resolver runs those lookups in small concurrent batches with a fixed delay
//! between batches to stay inside the provider's rate limits, and memoizes
//! each movie's answer so repeated resolution is cheap across requests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::tmdb::{CollectionId, MetadataClient, MovieId};

/// Movies looked up concurrently per batch.
const BATCH_SIZE: usize = 5;

/// Pause between consecutive batches.
const BATCH_DELAY: Duration = Duration::from_millis(100);

/// Seam between the discovery pipeline and collection resolution, so tests
/// can observe or replace the resolution step.
#[async_trait]
pub trait ResolveCollections: Send + Sync {
    /// Map movies to the distinct collections they belong to. Movies without
    /// a parent collection, and failed lookups, contribute nothing.
    async fn collection_ids(&self, movies: &[MovieId]) -> HashSet<CollectionId>;
}

/// Batched, memoizing [`ResolveCollections`] implementation backed by the
/// TMDB movie-detail endpoint.
pub struct CollectionResolver {
    client: Arc<dyn MetadataClient>,
    detail_cache: Cache<Option<CollectionId>>,
}

impl CollectionResolver {
    pub fn new(client: Arc<dyn MetadataClient>, detail_ttl: Duration) -> Self {
        Self {
            client,
            detail_cache: Cache::new(detail_ttl),
        }
    }

    /// Memoized parent-collection lookup for one movie. Lookup failures are
    /// logged and cached as "no parent" like any other absent collection.
    async fn parent_collection(&self, movie: MovieId) -> Option<CollectionId> {
        let client = self.client.clone();
        self.detail_cache
            .wrap(&movie.to_string(), move || async move {
                match client.movie_detail(movie).await {
                    Ok(detail) => {
                        if let Some(collection) = detail.collection {
                            debug!(movie = %movie, collection = %collection, "found parent collection");
                        }
                        detail.collection
                    }
                    Err(e) => {
                        warn!(movie = %movie, error = %e, "movie detail lookup failed");
                        None
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl ResolveCollections for CollectionResolver {
    async fn collection_ids(&self, movies: &[MovieId]) -> HashSet<CollectionId> {
        debug!(movies = movies.len(), "resolving parent collections");
        let mut collections = HashSet::new();

        let batch_count = movies.len().div_ceil(BATCH_SIZE);
        for (index, batch) in movies.chunks(BATCH_SIZE).enumerate() {
            debug!(batch = index + 1, of = batch_count, "processing resolver batch");

            let lookups = batch.iter().map(|movie| self.parent_collection(*movie));
            for parent in join_all(lookups).await {
                if let Some(id) = parent {
                    collections.insert(id);
                }
            }

            if index + 1 < batch_count {
                sleep(BATCH_DELAY).await;
            }
        }

        debug!(collections = collections.len(), "resolver finished");
        collections
    }
}
