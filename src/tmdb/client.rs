//! TMDB v3 REST API client.
//!
//! Implements [`MetadataClient`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{
    CollectionDetail, CollectionId, DiscoverPage, DiscoverParams, MovieDetail, MovieId,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;

/// Banner-like logo aspect ratios preferred for catalog rows.
const LOGO_ASPECT_RANGE: (f64, f64) = (1.5, 1.85);

/// Errors surfaced by the TMDB client. Callers in the catalog core downgrade
/// these to empty contributions; nothing above the orchestrator ever sees one.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("TMDB returned status {0}")]
    Status(u16),
}

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbDiscoverResponse {
    #[serde(default)]
    results: Vec<TmdbMovieRef>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: u64,
    belongs_to_collection: Option<TmdbCollectionRef>,
}

#[derive(Debug, Deserialize)]
struct TmdbCollectionRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct TmdbCollectionDetail {
    id: u64,
    name: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    poster_path: Option<String>,
    #[serde(default)]
    parts: Vec<TmdbCollectionPart>,
}

#[derive(Debug, Deserialize)]
struct TmdbCollectionPart {
    popularity: Option<f64>,
    vote_average: Option<f64>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovieRef>,
}

#[derive(Debug, Deserialize)]
struct TmdbImagesResponse {
    #[serde(default)]
    logos: Vec<TmdbImage>,
}

#[derive(Debug, Deserialize)]
struct TmdbImage {
    file_path: String,
    iso_639_1: Option<String>,
    #[serde(default)]
    aspect_ratio: f64,
}

impl TmdbImagesResponse {
    /// First English (or language-less) logo with a banner-like aspect ratio.
    fn banner_logo(&self) -> Option<String> {
        let (lo, hi) = LOGO_ASPECT_RANGE;
        self.logos
            .iter()
            .find(|logo| {
                matches!(logo.iso_639_1.as_deref(), Some("en") | None)
                    && logo.aspect_ratio >= lo
                    && logo.aspect_ratio <= hi
            })
            .map(|logo| format!("{IMAGE_BASE_URL}{}", logo.file_path))
    }
}

impl From<TmdbCollectionDetail> for CollectionDetail {
    fn from(wire: TmdbCollectionDetail) -> Self {
        // The collection endpoint itself rarely carries popularity / rating;
        // fall back to the best value among the member movies.
        let part_max = |f: fn(&TmdbCollectionPart) -> Option<f64>| {
            wire.parts
                .iter()
                .filter_map(f)
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        };

        let popularity = wire.popularity.or_else(|| part_max(|p| p.popularity));
        let rating = wire.vote_average.or_else(|| part_max(|p| p.vote_average));
        let poster = wire.poster_path.map(|p| format!("{IMAGE_BASE_URL}{p}"));

        let release_dates = wire
            .parts
            .iter()
            .filter_map(|p| p.release_date.clone())
            .filter(|d| !d.is_empty())
            .collect();

        CollectionDetail {
            id: CollectionId(wire.id),
            name: wire.name.unwrap_or_default(),
            popularity,
            rating,
            poster,
            release_dates,
        }
    }
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// Async seam between the catalog core and the metadata provider.
///
/// Implementations are expected to be wrapped in an `Arc` and shared across
/// tasks; tests substitute stub clients.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// One page of a paginated discovery query.
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
        page: u32,
    ) -> Result<DiscoverPage, ClientError>;

    /// Movie detail, reduced to the parent-collection reference.
    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ClientError>;

    /// Full collection detail for summary resolution.
    async fn collection_detail(&self, id: CollectionId) -> Result<CollectionDetail, ClientError>;

    /// Banner logo URL for a collection, if TMDB has a suitable one.
    async fn collection_logo(&self, id: CollectionId) -> Result<Option<String>, ClientError>;

    /// Collections matching a free-text query.
    async fn search_collections(&self, query: &str) -> Result<Vec<CollectionId>, ClientError>;

    /// Movies matching a free-text query.
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieId>, ClientError>;
}

// ---------------------------------------------------------------------------
// Client implementation
// ---------------------------------------------------------------------------

/// TMDB API client with built-in rate limiting and 429-retry logic.
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key and language.
    ///
    /// The `language` parameter should be an ISO-639-1 language tag such as
    /// `"en-US"`. Rate limiting is configured at 4 requests per second.
    pub fn new(api_key: String, language: String) -> Self {
        Self::with_base_url(api_key, language, TMDB_BASE_URL.to_string())
    }

    /// Like [`new`](Self::new) but targeting a custom API base URL. Used by
    /// integration tests to point the client at a mock server.
    pub fn with_base_url(api_key: String, language: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        let quota = Quota::per_second(NonZeroU32::new(4).unwrap());
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            base_url,
            api_key,
            language,
            rate_limiter,
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self.client.get(url).send().await?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                return Err(ClientError::Status(resp.status().as_u16()));
            }

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url, self.api_key, self.language
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

#[async_trait]
impl MetadataClient for TmdbClient {
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
        page: u32,
    ) -> Result<DiscoverPage, ClientError> {
        let page_str = page.to_string();
        let mut query: Vec<(&str, &str)> = params.iter().collect();
        query.push(("page", page_str.as_str()));

        let url = self.url("/discover/movie", &query);
        debug!(page, url = %url, "TMDB discover movies");

        let body: TmdbDiscoverResponse = self.get(&url).await?.json().await?;

        Ok(DiscoverPage {
            movie_ids: body.results.into_iter().map(|r| MovieId(r.id)).collect(),
            total_pages: body.total_pages,
            total_results: body.total_results,
        })
    }

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, ClientError> {
        let url = self.url(&format!("/movie/{id}"), &[]);
        debug!(movie = %id, "TMDB movie detail");

        let detail: TmdbMovieDetail = self.get(&url).await?.json().await?;

        Ok(MovieDetail {
            id: MovieId(detail.id),
            collection: detail.belongs_to_collection.map(|c| CollectionId(c.id)),
        })
    }

    async fn collection_detail(&self, id: CollectionId) -> Result<CollectionDetail, ClientError> {
        let url = self.url(&format!("/collection/{id}"), &[]);
        debug!(collection = %id, "TMDB collection detail");

        let detail: TmdbCollectionDetail = self.get(&url).await?.json().await?;

        Ok(detail.into())
    }

    async fn collection_logo(&self, id: CollectionId) -> Result<Option<String>, ClientError> {
        let url = self.url(
            &format!("/collection/{id}/images"),
            &[("include_image_language", "en,null")],
        );
        debug!(collection = %id, "TMDB collection images");

        let images: TmdbImagesResponse = self.get(&url).await?.json().await?;

        Ok(images.banner_logo())
    }

    async fn search_collections(&self, query: &str) -> Result<Vec<CollectionId>, ClientError> {
        let url = self.url("/search/collection", &[("query", query)]);
        debug!(query, "TMDB search collections");

        let body: TmdbSearchResponse = self.get(&url).await?.json().await?;

        Ok(body.results.into_iter().map(|r| CollectionId(r.id)).collect())
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieId>, ClientError> {
        let url = self.url("/search/movie", &[("query", query)]);
        debug!(query, "TMDB search movies");

        let body: TmdbSearchResponse = self.get(&url).await?.json().await?;

        Ok(body.results.into_iter().map(|r| MovieId(r.id)).collect())
    }
}
