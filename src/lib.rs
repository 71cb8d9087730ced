//! TMDB Collections - Stremio addon that aggregates TMDB movie collections
//!
//! This library crate exposes the core functionality for integration testing.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod manifest;
pub mod server;
pub mod tmdb;
