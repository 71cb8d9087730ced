//! Stremio addon manifest.

use serde::Serialize;

use crate::catalog::{tables, CatalogKind, ADDON_PREFIX};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub resources: Vec<String>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<ManifestCatalog>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCatalog {
    #[serde(rename = "type")]
    pub media_type: String,
    pub id: String,
    pub name: String,
    pub extra: Vec<ManifestExtra>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestExtra {
    pub name: String,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ManifestExtra {
    fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_required: false,
            options: Vec::new(),
        }
    }

    fn genre() -> Self {
        Self {
            name: "genre".to_string(),
            is_required: false,
            options: tables::genre_names().iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Whether a catalog supports free-text search. Discovery catalogs with a
/// fixed ranking (top-rated, new releases) do not: search results have no
/// meaningful order under their sort key.
fn supports_search(kind: CatalogKind) -> bool {
    matches!(
        kind,
        CatalogKind::Popular | CatalogKind::Pixar | CatalogKind::DisneyPrincess
    )
}

/// Whether a catalog offers a genre filter.
fn supports_genre(kind: CatalogKind) -> bool {
    matches!(
        kind,
        CatalogKind::Popular | CatalogKind::TopRated | CatalogKind::NewReleases
    )
}

/// Build the addon manifest published at `/manifest.json`.
pub fn manifest() -> Manifest {
    let catalogs = CatalogKind::ALL
        .into_iter()
        .map(|kind| {
            let mut extra = vec![ManifestExtra::plain("skip")];
            if supports_genre(kind) {
                extra.push(ManifestExtra::genre());
            }
            if supports_search(kind) {
                extra.push(ManifestExtra::plain("search"));
            }
            ManifestCatalog {
                media_type: "collections".to_string(),
                id: kind.catalog_id(),
                name: kind.display_name().to_string(),
                extra,
            }
        })
        .collect();

    Manifest {
        id: "org.stremio.tmdb-collections".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "TMDB Collections".to_string(),
        description: "Movie collections aggregated from TMDB discovery, search, and curated lists"
            .to_string(),
        types: vec!["movie".to_string(), "collections".to_string()],
        resources: vec!["catalog".to_string()],
        id_prefixes: vec![format!("{ADDON_PREFIX}.")],
        catalogs,
    }
}
