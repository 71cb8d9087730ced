//! Static lookup tables: TMDB movie genres and the curated Disney Princess
//! catalog.

use crate::tmdb::{CollectionId, MovieId};

/// TMDB movie genre list (name → numeric ID).
pub const MOVIE_GENRES: &[(&str, u64)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("TV Movie", 10770),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
];

/// Numeric TMDB ID for a genre name.
///
/// # Panics
///
/// Panics on an unknown genre name. The manifest only offers names from
/// [`MOVIE_GENRES`], so an unknown name means a malformed request or a table
/// drift and is treated as a hard fault.
pub fn genre_id(name: &str) -> u64 {
    MOVIE_GENRES
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
        .unwrap_or_else(|| panic!("unknown genre name: {name}"))
}

pub fn genre_names() -> Vec<&'static str> {
    MOVIE_GENRES.iter().map(|(name, _)| *name).collect()
}

/// Pixar's production-company ID on TMDB.
pub const PIXAR_COMPANY_ID: u64 = 3;

/// Core Disney Princess movies; their parent collections are resolved at
/// request time and unioned with [`DISNEY_PRINCESS_COLLECTIONS`].
pub const DISNEY_PRINCESS_MOVIES: &[MovieId] = &[
    MovieId(277834), // Moana
    MovieId(109445), // Frozen
    MovieId(812),    // Aladdin
    MovieId(10882),  // Mulan
    MovieId(11970),  // Beauty and the Beast (1991)
    MovieId(10198),  // The Little Mermaid
    MovieId(11224),  // The Princess and the Frog
    MovieId(9325),   // Pocahontas
    MovieId(12454),  // Tangled
    MovieId(260513), // Brave
    MovieId(49013),  // Sleeping Beauty
    MovieId(11318),  // Snow White and the Seven Dwarfs
    MovieId(9479),   // Cinderella (1950)
];

/// Collections that contain Disney Princess movies.
pub const DISNEY_PRINCESS_COLLECTIONS: &[CollectionId] = &[
    CollectionId(87800),  // Princess Collection
    CollectionId(425),    // Disney Animated Feature Collection
    CollectionId(338953), // Disney Princess Collection
];
