//! Price tracking and cross-store comparison engine.
//!
//! Ingestion collaborators push point-in-time [`models::PriceObservation`]s;
//! the engine appends them to an immutable log, maintains one current price
//! record per (product, store) pair, and answers cheapest-offer, staleness
//! and price-trend queries for the presentation layer.

pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use catalog::{Catalog, InMemoryCatalog};
pub use config::EngineConfig;
pub use engine::PriceEngine;
pub use errors::EngineError;
