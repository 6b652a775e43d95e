//! Core business logic for the Explore engagement engine.
//!
//! Video ingestion (validation, upload targets, registration), engagement
//! analytics, the ranking score and the batch recomputation sweeps.

pub mod services;

pub use services::*;
