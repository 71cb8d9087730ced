//! Catalog aggregation core.
//!
//! Turns TMDB discovery queries into sorted collection catalogs:
//! [`discover`] fetches page windows and widens them until enough distinct
//! collections are found, [`resolver`] maps movies to their parent
//! collections in rate-limit-aware batches, and [`service`] dispatches per
//! catalog kind and assembles the final sorted response.

pub mod discover;
pub mod kind;
pub mod params;
pub mod resolver;
pub mod search;
pub mod service;
pub mod summary;
pub mod tables;

pub use discover::{CollectionDiscovery, ExpansionOutcome};
pub use kind::{CatalogExtra, CatalogKind, ADDON_PREFIX};
pub use params::{discover_params, SortKey};
pub use resolver::{CollectionResolver, ResolveCollections};
pub use service::{CatalogResponse, CatalogService};
pub use summary::CollectionSummary;
