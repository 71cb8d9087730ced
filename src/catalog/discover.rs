//! Paged discovery and iterative window expansion.
//!
//! [`CollectionDiscovery::fetch_window`] turns one contiguous page window of
//! a discovery query into a deduplicated collection-ID set;
//! [`CollectionDiscovery::discover_until`] repeatedly widens the window until
//! a target number of distinct collections is accumulated or the search
//! bounds are exhausted. Both are best-effort: timeouts and failed pages
//! contribute empty results and are never raised to the caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::tmdb::{CollectionId, DiscoverParams, MetadataClient, MovieId};

use super::resolver::ResolveCollections;

/// Deadline for a single discovery page request.
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Movies resolved per concurrent resolver chunk.
const MOVIE_CHUNK_SIZE: usize = 20;

/// Pages added to the window per expansion iteration.
const PAGE_STEP: u32 = 2;

/// Deadline for one whole expansion iteration (fetch + resolve).
const WINDOW_TIMEOUT: Duration = Duration::from_secs(25);

/// Pause between expansion iterations.
const EXPANSION_DELAY: Duration = Duration::from_millis(200);

/// Why an expansion run stopped. Diagnostic only: every outcome carries the
/// same accumulated set and callers outside this module treat them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// The target collection count was reached.
    Success,
    /// An iteration added no new collections.
    Exhausted,
    /// The page bound was reached before the target.
    Bounded,
}

/// Discovery pipeline: concurrent page fetches feeding chunked resolution.
pub struct CollectionDiscovery {
    client: Arc<dyn MetadataClient>,
    resolver: Arc<dyn ResolveCollections>,
}

impl CollectionDiscovery {
    pub fn new(client: Arc<dyn MetadataClient>, resolver: Arc<dyn ResolveCollections>) -> Self {
        Self { client, resolver }
    }

    /// Fetch the inclusive page window `[from, to]` and resolve the movies it
    /// yields to their parent collections.
    ///
    /// Pages are fetched fully concurrently, each raced against
    /// [`PAGE_TIMEOUT`]; a page that fails or times out contributes an empty
    /// result without affecting its siblings. The deduplicated movie set is
    /// split into chunks of [`MOVIE_CHUNK_SIZE`] which are resolved
    /// concurrently.
    pub async fn fetch_window(
        &self,
        params: &DiscoverParams,
        from: u32,
        to: u32,
    ) -> HashSet<CollectionId> {
        debug!(from, to, "fetching discovery window");

        let pages = (from..=to).map(|page| async move {
            match timeout(PAGE_TIMEOUT, self.client.discover_movies(params, page)).await {
                Ok(Ok(result)) => {
                    debug!(
                        page,
                        movies = result.movie_ids.len(),
                        total_pages = result.total_pages,
                        "discovery page fetched"
                    );
                    result.movie_ids
                }
                Ok(Err(e)) => {
                    warn!(page, error = %e, "discovery page failed");
                    Vec::new()
                }
                Err(_) => {
                    warn!(page, timeout_secs = PAGE_TIMEOUT.as_secs(), "discovery page timed out");
                    Vec::new()
                }
            }
        });

        let movie_ids: HashSet<MovieId> = join_all(pages).await.into_iter().flatten().collect();
        debug!(movies = movie_ids.len(), "unique movies in window");

        if movie_ids.is_empty() {
            return HashSet::new();
        }

        let movie_ids: Vec<MovieId> = movie_ids.into_iter().collect();
        let chunks = movie_ids
            .chunks(MOVIE_CHUNK_SIZE)
            .map(|chunk| self.resolver.collection_ids(chunk));

        let collections: HashSet<CollectionId> =
            join_all(chunks).await.into_iter().flatten().collect();
        debug!(collections = collections.len(), "window resolved");
        collections
    }

    /// Widen the page window in steps of [`PAGE_STEP`] until at least
    /// `target` distinct collections are accumulated, an iteration stops
    /// producing new ones, or `max_page` is reached.
    ///
    /// Each iteration is raced against [`WINDOW_TIMEOUT`]; expiry counts as
    /// zero growth for that iteration. The outcome is informational; all
    /// three terminal states return the accumulated set the same way.
    pub async fn discover_until(
        &self,
        params: &DiscoverParams,
        target: usize,
        max_page: u32,
    ) -> (HashSet<CollectionId>, ExpansionOutcome) {
        let mut accumulated: HashSet<CollectionId> = HashSet::new();
        let mut from = 1u32;

        let outcome = loop {
            if accumulated.len() >= target {
                break ExpansionOutcome::Success;
            }
            if from > max_page {
                break ExpansionOutcome::Bounded;
            }

            let to = from.saturating_add(PAGE_STEP - 1).min(max_page);
            let fresh = match timeout(WINDOW_TIMEOUT, self.fetch_window(params, from, to)).await {
                Ok(set) => set,
                Err(_) => {
                    warn!(from, to, "expansion iteration timed out");
                    HashSet::new()
                }
            };

            let before = accumulated.len();
            accumulated.extend(fresh);
            info!(
                from,
                to,
                added = accumulated.len() - before,
                total = accumulated.len(),
                "expansion iteration complete"
            );

            if accumulated.len() >= target {
                break ExpansionOutcome::Success;
            }
            if accumulated.len() == before {
                break ExpansionOutcome::Exhausted;
            }

            sleep(EXPANSION_DELAY).await;
            from = to + 1;
        };

        info!(
            collections = accumulated.len(),
            outcome = ?outcome,
            "expansion finished"
        );
        (accumulated, outcome)
    }
}
