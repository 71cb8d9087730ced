//! Catalog identifiers and request extras.

use std::fmt;

/// ID prefix shared by every catalog (and meta ID) this addon serves.
pub const ADDON_PREFIX: &str = "tmdbcf";

/// The closed set of catalogs the addon serves.
///
/// Dispatching on an enum instead of raw catalog-ID strings keeps the
/// per-catalog parameter/sort configuration exhaustively checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Popular,
    TopRated,
    NewReleases,
    Pixar,
    DisneyPrincess,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Popular,
        CatalogKind::TopRated,
        CatalogKind::NewReleases,
        CatalogKind::Pixar,
        CatalogKind::DisneyPrincess,
    ];

    /// Parse a manifest catalog ID such as `"tmdbcf.popular"`.
    pub fn from_catalog_id(id: &str) -> Option<Self> {
        let slug = id.strip_prefix(ADDON_PREFIX)?.strip_prefix('.')?;
        match slug {
            "popular" => Some(CatalogKind::Popular),
            "topRated" => Some(CatalogKind::TopRated),
            "newReleases" => Some(CatalogKind::NewReleases),
            "pixar" => Some(CatalogKind::Pixar),
            "disneyPrincess" => Some(CatalogKind::DisneyPrincess),
            _ => None,
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            CatalogKind::Popular => "popular",
            CatalogKind::TopRated => "topRated",
            CatalogKind::NewReleases => "newReleases",
            CatalogKind::Pixar => "pixar",
            CatalogKind::DisneyPrincess => "disneyPrincess",
        }
    }

    /// Full catalog ID as published in the manifest.
    pub fn catalog_id(&self) -> String {
        format!("{ADDON_PREFIX}.{}", self.slug())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CatalogKind::Popular => "Popular",
            CatalogKind::TopRated => "Top Rated",
            CatalogKind::NewReleases => "New Releases",
            CatalogKind::Pixar => "Pixar Movies",
            CatalogKind::DisneyPrincess => "Disney Princess",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Optional extras attached to a catalog request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogExtra {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub skip: Option<u32>,
}

impl CatalogExtra {
    /// Parse the Stremio extra path segment, a querystring-encoded list such
    /// as `"genre=Science+Fiction&skip=20"`. Unknown keys are ignored.
    pub fn parse(segment: &str) -> Self {
        let mut extra = CatalogExtra::default();
        for pair in segment.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = percent_decode(value);
            if value.is_empty() {
                continue;
            }
            match key {
                "search" => extra.search = Some(value),
                "genre" => extra.genre = Some(value),
                "skip" => extra.skip = value.parse().ok(),
                _ => {}
            }
        }
        extra
    }
}

/// Inverse of the client's minimal query encoding: `+` becomes space and
/// `%XX` sequences are decoded. Malformed escapes are passed through as-is.
fn percent_decode(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 3 <= bytes.len() && bytes[i + 1..i + 3].is_ascii() => {
                match u8::from_str_radix(&s[i + 1..i + 3], 16) {
                    Ok(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    Err(_) => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
