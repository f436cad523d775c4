//! `nomenclator` - photo album titles from capture time, place and weather
//!
//! Each photo record (timestamp and coordinates) is enriched with a place
//! name and the weather of that day, then the album is classified into a
//! title such as "A foggy weekend in New York".

pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod input;
pub mod locator;
pub mod logging;
pub mod models;
pub mod processor;
pub mod resolver;
pub mod weather;

// Re-export core types for public API
pub use classifier::{Mood, Span};
pub use config::NomenclatorConfig;
pub use error::{NomenclatorError, ResolverKind, RowError};
pub use locator::PositionstackLocator;
pub use models::{EnrichedRecord, ParsedRecord, PlaceDescriptor, ProcessingOutcome, RawRecord, WeatherSummary};
pub use processor::Processor;
pub use resolver::{PlaceResolver, WeatherResolver};
pub use weather::VisualCrossingWeatherman;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NomenclatorError>;
