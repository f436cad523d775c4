//! Data models for the nomenclator pipeline
//!
//! This module contains the domain models organized by concern:
//! - Record: raw input rows and their parsed form
//! - Place: reverse geocoding results
//! - Weather: historical weather summaries
//! - Album: enriched photos and the processing outcome

pub mod album;
pub mod place;
pub mod record;
pub mod weather;

// Re-export all public types for convenient access
pub use album::{EnrichedRecord, ProcessingOutcome};
pub use place::PlaceDescriptor;
pub use record::{ParsedRecord, RawRecord};
pub use weather::WeatherSummary;
