//! Per-catalog discovery parameter templates and sort keys.

use chrono::{Months, Utc};

use crate::tmdb::DiscoverParams;

use super::kind::CatalogKind;
use super::tables;

/// Which summary field a catalog is sorted by (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Popularity,
    Rating,
    LatestRelease,
}

/// Build the discovery parameter template and sort key for a catalog.
///
/// Each template starts from a `vote_count.gte = 100` base floor, which
/// individual catalogs override. A genre filter is translated to its numeric
/// TMDB ID via [`tables::genre_id`]; an unknown genre name panics there.
pub fn discover_params(kind: CatalogKind, genre: Option<&str>) -> (DiscoverParams, SortKey) {
    let mut params = DiscoverParams::new();
    params.set("vote_count.gte", "100");

    let sort_key = match kind {
        CatalogKind::Popular => {
            params.set("sort_by", "popularity.desc");
            params.set("vote_average.gte", "7");
            params.set("vote_count.gte", "20");
            SortKey::Popularity
        }
        CatalogKind::Pixar => {
            params.set("with_companies", tables::PIXAR_COMPANY_ID.to_string());
            params.set("sort_by", "popularity.desc");
            // Lower floors than the other catalogs: the company filter is
            // already narrow and many shorts have few votes.
            params.set("vote_count.gte", "50");
            params.set("vote_average.gte", "6");
            SortKey::Popularity
        }
        CatalogKind::TopRated => {
            // Rating-sorted discovery needs a vote-count floor tuned per
            // genre bucket, or tiny-vote outliers dominate the ranking.
            match genre {
                None => params.set("vote_count.gte", "13000"),
                Some("Music") | Some("TV Movie") | Some("War") => {
                    params.set("vote_count.gte", "300")
                }
                Some("Documentary") | Some("History") | Some("Western") => {
                    // Sparse genres keep the base floor.
                }
                Some(_) => params.set("vote_count.gte", "3000"),
            }
            params.set("sort_by", "vote_average.desc");
            SortKey::Rating
        }
        CatalogKind::NewReleases => {
            params.set("sort_by", "release_date.desc");
            params.set("primary_release_date.gte", one_year_ago());
            params.set("vote_count.gte", "5");
            params.set("vote_average.gte", "5");
            SortKey::LatestRelease
        }
        // Curated catalog: never reaches discovery, sorted by popularity.
        CatalogKind::DisneyPrincess => SortKey::Popularity,
    };

    if let Some(name) = genre {
        params.set("with_genres", tables::genre_id(name).to_string());
    }

    (params, sort_key)
}

/// Rolling release-date floor: today minus one calendar year, `YYYY-MM-DD`.
fn one_year_ago() -> String {
    let today = Utc::now().date_naive();
    today
        .checked_sub_months(Months::new(12))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}
