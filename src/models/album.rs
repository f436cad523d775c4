//! Enriched photos and the outcome of processing a whole album

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlaceDescriptor, WeatherSummary};
use crate::{NomenclatorError, RowError};

/// A photo with its resolved place and weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub place: PlaceDescriptor,
    pub weather: WeatherSummary,
    /// Capture time taken from the input row
    pub timestamp: DateTime<Utc>,
}

impl EnrichedRecord {
    #[must_use]
    pub fn new(place: PlaceDescriptor, weather: WeatherSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            place,
            weather,
            timestamp,
        }
    }
}

/// Result of processing every row of an album
#[derive(Debug, Default)]
pub struct ProcessingOutcome {
    /// Generated title, empty when no row could be enriched
    pub title: String,
    /// One entry per failed row, in input order
    pub errors: Vec<RowError>,
}

impl ProcessingOutcome {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title, or [`NomenclatorError::EmptyResult`] when none could be produced
    pub fn require_title(&self) -> Result<&str, NomenclatorError> {
        if self.title.is_empty() {
            Err(NomenclatorError::EmptyResult)
        } else {
            Ok(&self.title)
        }
    }

    /// Error messages in input order
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
