use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key. Falls back to the `TMDB_API_KEY` environment
    /// variable when absent from the config file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// ISO-639-1 language tag sent with every TMDB request.
    #[serde(default = "default_language")]
    pub language: String,
}

impl TmdbConfig {
    /// API key from the config file, or the `TMDB_API_KEY` environment
    /// variable as a fallback.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("TMDB_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// TTL for discovered catalogs (collection-ID sets and sorted metas).
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: u64,

    /// TTL for per-movie detail lookups.
    #[serde(default = "default_detail_ttl")]
    pub detail_ttl_secs: u64,

    /// TTL for search results.
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    7000
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_catalog_ttl() -> u64 {
    12 * 60 * 60
}
fn default_detail_ttl() -> u64 {
    24 * 60 * 60
}
fn default_search_ttl() -> u64 {
    60 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            catalog_ttl_secs: default_catalog_ttl(),
            detail_ttl_secs: default_detail_ttl(),
            search_ttl_secs: default_search_ttl(),
        }
    }
}
