//! Free-text collection search.
//!
//! TMDB's collection search only matches collection names, so a query like a
//! lead actor or a franchise nickname often finds movies but not their
//! collection. The search path therefore unions two routes: direct collection
//! search, and movie search followed by parent-collection resolution.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::tmdb::{CollectionId, MetadataClient};

use super::resolver::ResolveCollections;

/// Search collections by free text. Either route failing contributes an
/// empty set rather than an error.
pub async fn collection_search(
    client: &dyn MetadataClient,
    resolver: &dyn ResolveCollections,
    query: &str,
) -> HashSet<CollectionId> {
    let (direct, movies) = tokio::join!(
        client.search_collections(query),
        client.search_movies(query),
    );

    let mut collections: HashSet<CollectionId> = match direct {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            warn!(query, error = %e, "collection search failed");
            HashSet::new()
        }
    };

    match movies {
        Ok(ids) => {
            collections.extend(resolver.collection_ids(&ids).await);
        }
        Err(e) => warn!(query, error = %e, "movie search failed"),
    }

    debug!(query, collections = collections.len(), "search resolved");
    collections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{
        ClientError, CollectionDetail, DiscoverPage, DiscoverParams, MovieDetail, MovieId,
    };
    use async_trait::async_trait;

    /// Client whose collection search finds {10, 11} and whose movie search
    /// finds movies {100, 101}; either route can be made to fail.
    struct SearchClient {
        collections_fail: bool,
        movies_fail: bool,
    }

    #[async_trait]
    impl MetadataClient for SearchClient {
        async fn discover_movies(
            &self,
            _params: &DiscoverParams,
            _page: u32,
        ) -> Result<DiscoverPage, ClientError> {
            unimplemented!("not used by search tests")
        }

        async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ClientError> {
            Ok(MovieDetail {
                id,
                collection: Some(CollectionId(id.0 + 1000)),
            })
        }

        async fn collection_detail(
            &self,
            _id: CollectionId,
        ) -> Result<CollectionDetail, ClientError> {
            unimplemented!("not used by search tests")
        }

        async fn collection_logo(&self, _id: CollectionId) -> Result<Option<String>, ClientError> {
            Ok(None)
        }

        async fn search_collections(&self, _query: &str) -> Result<Vec<CollectionId>, ClientError> {
            if self.collections_fail {
                return Err(ClientError::Status(500));
            }
            Ok(vec![CollectionId(10), CollectionId(11)])
        }

        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieId>, ClientError> {
            if self.movies_fail {
                return Err(ClientError::Status(500));
            }
            Ok(vec![MovieId(100), MovieId(101)])
        }
    }

    struct PassthroughResolver;

    #[async_trait]
    impl ResolveCollections for PassthroughResolver {
        async fn collection_ids(&self, movies: &[MovieId]) -> HashSet<CollectionId> {
            movies.iter().map(|m| CollectionId(m.0 + 1000)).collect()
        }
    }

    fn ids(set: &HashSet<CollectionId>) -> Vec<u64> {
        let mut ids: Vec<u64> = set.iter().map(|c| c.0).collect();
        ids.sort_unstable();
        ids
    }

    #[tokio::test]
    async fn unions_both_routes() {
        let client = SearchClient {
            collections_fail: false,
            movies_fail: false,
        };
        let found = collection_search(&client, &PassthroughResolver, "frozen").await;
        assert_eq!(ids(&found), vec![10, 11, 1100, 1101]);
    }

    #[tokio::test]
    async fn collection_route_failure_keeps_movie_route() {
        let client = SearchClient {
            collections_fail: true,
            movies_fail: false,
        };
        let found = collection_search(&client, &PassthroughResolver, "frozen").await;
        assert_eq!(ids(&found), vec![1100, 1101]);
    }

    #[tokio::test]
    async fn movie_route_failure_keeps_collection_route() {
        let client = SearchClient {
            collections_fail: false,
            movies_fail: true,
        };
        let found = collection_search(&client, &PassthroughResolver, "frozen").await;
        assert_eq!(ids(&found), vec![10, 11]);
    }

    #[tokio::test]
    async fn both_routes_failing_is_empty_not_error() {
        let client = SearchClient {
            collections_fail: true,
            movies_fail: true,
        };
        let found = collection_search(&client, &PassthroughResolver, "frozen").await;
        assert!(found.is_empty());
    }
}
