//! Domain types produced and consumed by the TMDB client.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque TMDB movie identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

/// Opaque TMDB collection (franchise grouping) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Filter parameters for a `/discover/movie` query.
///
/// Built once per catalog request and passed unchanged downstream. Keys are
/// kept sorted so [`cache_key`](Self::cache_key) is stable for identical
/// parameter sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverParams(BTreeMap<String, String>);

impl DiscoverParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter, replacing any previous value for the same key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Stable `key=value&key=value` rendering used as a cache key.
    pub fn cache_key(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

/// One page of `/discover/movie` results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverPage {
    pub movie_ids: Vec<MovieId>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// The slice of movie detail the catalog core cares about: which collection
/// (if any) the movie belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetail {
    pub id: MovieId,
    pub collection: Option<CollectionId>,
}

/// Resolved collection metadata, consumed read-only for sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDetail {
    pub id: CollectionId,
    pub name: String,
    pub popularity: Option<f64>,
    pub rating: Option<f64>,
    /// Full URL of the collection poster, when TMDB has one.
    pub poster: Option<String>,
    /// Release dates of the collection's member movies (ISO-8601, unordered).
    pub release_dates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_sorted_and_stable() {
        let mut a = DiscoverParams::new();
        a.set("sort_by", "popularity.desc");
        a.set("vote_count.gte", "100");

        let mut b = DiscoverParams::new();
        b.set("vote_count.gte", "100");
        b.set("sort_by", "popularity.desc");

        assert_eq!(a.cache_key(), "sort_by=popularity.desc&vote_count.gte=100");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut params = DiscoverParams::new();
        params.set("vote_count.gte", "100");
        params.set("vote_count.gte", "13000");

        assert_eq!(params.get("vote_count.gte"), Some("13000"));
    }
}
