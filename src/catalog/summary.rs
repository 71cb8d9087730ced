//! Collection summaries: concurrent detail resolution and sorting.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::tmdb::{CollectionDetail, CollectionId, MetadataClient};

use super::params::SortKey;

/// Catalog-facing view of a collection.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl From<CollectionDetail> for CollectionSummary {
    fn from(detail: CollectionDetail) -> Self {
        let latest_release = detail.release_dates.into_iter().max();
        Self {
            id: detail.id,
            name: detail.name,
            popularity: detail.popularity,
            rating: detail.rating,
            latest_release,
            poster: detail.poster,
            logo: None,
        }
    }
}

/// Fetch summaries for a set of collections concurrently. Collections whose
/// detail lookup fails are logged and dropped from the result; a failed logo
/// lookup only costs the logo.
pub async fn resolve_summaries(
    client: &dyn MetadataClient,
    ids: impl IntoIterator<Item = CollectionId>,
) -> Vec<CollectionSummary> {
    let lookups = ids.into_iter().map(|id| async move {
        let (detail, logo) = tokio::join!(client.collection_detail(id), client.collection_logo(id));
        match detail {
            Ok(detail) => {
                let mut summary = CollectionSummary::from(detail);
                summary.logo = logo.unwrap_or_else(|e| {
                    debug!(collection = %id, error = %e, "collection logo lookup failed");
                    None
                });
                Some(summary)
            }
            Err(e) => {
                warn!(collection = %id, error = %e, "collection detail lookup failed");
                None
            }
        }
    });

    let summaries: Vec<CollectionSummary> = join_all(lookups).await.into_iter().flatten().collect();
    debug!(summaries = summaries.len(), "collection summaries resolved");
    summaries
}

/// Sort summaries descending by the given key. Missing numeric values rank
/// as zero; collections without a release date sort last.
pub fn sort_summaries(summaries: &mut [CollectionSummary], key: SortKey) {
    match key {
        SortKey::Popularity => summaries.sort_by(|a, b| {
            b.popularity
                .unwrap_or(0.0)
                .total_cmp(&a.popularity.unwrap_or(0.0))
        }),
        SortKey::Rating => summaries.sort_by(|a, b| {
            b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0))
        }),
        SortKey::LatestRelease => {
            summaries.sort_by(|a, b| b.latest_release.cmp(&a.latest_release));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{ClientError, DiscoverPage, DiscoverParams, MovieDetail, MovieId};
    use async_trait::async_trait;

    fn summary(id: u64) -> CollectionSummary {
        CollectionSummary {
            id: CollectionId(id),
            name: format!("Collection {id}"),
            popularity: None,
            rating: None,
            latest_release: None,
            poster: None,
            logo: None,
        }
    }

    #[test]
    fn latest_release_is_lexicographic_max() {
        let detail = CollectionDetail {
            id: CollectionId(1),
            name: "C".into(),
            popularity: Some(1.0),
            rating: Some(7.0),
            poster: Some("https://image.tmdb.org/t/p/w500/c.jpg".into()),
            release_dates: vec![
                "2010-06-18".into(),
                "2019-06-21".into(),
                "1995-11-22".into(),
            ],
        };
        let summary = CollectionSummary::from(detail);
        assert_eq!(summary.latest_release.as_deref(), Some("2019-06-21"));
        assert_eq!(
            summary.poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/c.jpg")
        );
    }

    #[test]
    fn sorts_by_popularity_descending_with_missing_as_zero() {
        let mut summaries = vec![
            CollectionSummary {
                popularity: Some(5.0),
                ..summary(1)
            },
            CollectionSummary {
                popularity: None,
                ..summary(2)
            },
            CollectionSummary {
                popularity: Some(80.0),
                ..summary(3)
            },
        ];
        sort_summaries(&mut summaries, SortKey::Popularity);
        let order: Vec<u64> = summaries.iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn sorts_by_rating_descending() {
        let mut summaries = vec![
            CollectionSummary {
                rating: Some(6.1),
                ..summary(1)
            },
            CollectionSummary {
                rating: Some(8.4),
                ..summary(2)
            },
        ];
        sort_summaries(&mut summaries, SortKey::Rating);
        let order: Vec<u64> = summaries.iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn sorts_by_latest_release_with_undated_last() {
        let mut summaries = vec![
            CollectionSummary {
                latest_release: None,
                ..summary(1)
            },
            CollectionSummary {
                latest_release: Some("2024-01-01".into()),
                ..summary(2)
            },
            CollectionSummary {
                latest_release: Some("2020-05-05".into()),
                ..summary(3)
            },
        ];
        sort_summaries(&mut summaries, SortKey::LatestRelease);
        let order: Vec<u64> = summaries.iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    struct DetailClient;

    #[async_trait]
    impl MetadataClient for DetailClient {
        async fn discover_movies(
            &self,
            _params: &DiscoverParams,
            _page: u32,
        ) -> Result<DiscoverPage, ClientError> {
            unimplemented!("not used by summary tests")
        }

        async fn movie_detail(&self, _id: MovieId) -> Result<MovieDetail, ClientError> {
            unimplemented!("not used by summary tests")
        }

        async fn collection_detail(
            &self,
            id: CollectionId,
        ) -> Result<CollectionDetail, ClientError> {
            if id.0 == 404 {
                return Err(ClientError::Status(404));
            }
            Ok(CollectionDetail {
                id,
                name: format!("Collection {}", id.0),
                popularity: Some(id.0 as f64),
                rating: Some(7.0),
                poster: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", id.0)),
                release_dates: vec!["2020-01-01".into()],
            })
        }

        async fn collection_logo(&self, id: CollectionId) -> Result<Option<String>, ClientError> {
            // Collection 2 has no logo endpoint worth the name.
            if id.0 == 2 {
                return Err(ClientError::Status(500));
            }
            Ok(Some(format!(
                "https://image.tmdb.org/t/p/w500/logo{}.png",
                id.0
            )))
        }

        async fn search_collections(&self, _query: &str) -> Result<Vec<CollectionId>, ClientError> {
            Ok(Vec::new())
        }

        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieId>, ClientError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn failed_details_are_dropped() {
        let client = DetailClient;
        let mut summaries = resolve_summaries(
            &client,
            [CollectionId(1), CollectionId(404), CollectionId(2)],
        )
        .await;
        summaries.sort_by_key(|s| s.id.0);

        let ids: Vec<u64> = summaries.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(summaries[0].name, "Collection 1");
        assert_eq!(
            summaries[0].logo.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/logo1.png")
        );
        // A failed logo lookup drops only the logo, not the summary.
        assert_eq!(summaries[1].logo, None);
        assert!(summaries[1].poster.is_some());
    }
}
