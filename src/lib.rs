//! Maps Lead Enrichment Library
//!
//! Finds businesses through a maps search, looks up executive contacts at
//! each of them through a people-search provider, and exports the people
//! found as JSON and CSV.
//!
//! # Modules
//!
//! - `core`: Pipeline, models and errors.
//! - `integrations`: External provider clients.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `export`: JSON and CSV writers.
//! - `geocoder`: Place name to coordinate lookup (nominatim).
//! - `lead_client`: People-search client (Lemlist).
//! - `maps_client`: Maps search client (SerpAPI).
//! - `models`: Core data models.
//! - `pipeline`: Run orchestration.

pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and the binary
pub mod config;
pub mod errors;
pub mod export;
pub mod geocoder;
pub mod lead_client;
pub mod maps_client;
pub mod models;
pub mod pipeline;
