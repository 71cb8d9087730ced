//! TMDB v3 API integration.
//!
//! [`client`] wraps the REST API behind the [`MetadataClient`] trait so the
//! catalog core can be exercised with stub clients in tests; [`models`] holds
//! the domain types the rest of the crate consumes.

pub mod client;
pub mod models;

pub use client::{ClientError, MetadataClient, TmdbClient};
pub use models::{
    CollectionDetail, CollectionId, DiscoverPage, DiscoverParams, MovieDetail, MovieId,
};
