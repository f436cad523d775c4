//! Photo record models: raw input rows and their parsed form

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::NomenclatorError;

/// Exact timestamp layout accepted for a photo, e.g. `2020-03-30T14:12:19Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One input row as read from the source: `[timestamp, latitude, longitude]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    /// Create a raw record from its fields
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, index: usize, name: &str) -> Result<&str, NomenclatorError> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| NomenclatorError::parse(format!("missing {name}")))
    }
}

impl<const N: usize> From<[&str; N]> for RawRecord {
    fn from(fields: [&str; N]) -> Self {
        Self::new(fields.iter().map(|f| (*f).to_string()).collect())
    }
}

impl From<&csv::StringRecord> for RawRecord {
    fn from(record: &csv::StringRecord) -> Self {
        Self::new(record.iter().map(str::to_string).collect())
    }
}

/// A validated photo record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// When the photo was taken (UTC)
    pub timestamp: DateTime<Utc>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl ParsedRecord {
    /// Validate a raw row and turn it into a typed record.
    ///
    /// Fields past the third are ignored.
    pub fn parse(raw: &RawRecord) -> Result<Self, NomenclatorError> {
        if raw.is_empty() {
            return Err(NomenclatorError::parse("empty row"));
        }

        let timestamp = parse_timestamp(raw.field(0, "timestamp")?)?;
        let latitude = parse_coordinate(raw.field(1, "latitude")?, "latitude")?;
        let longitude = parse_coordinate(raw.field(2, "longitude")?, "longitude")?;

        Ok(Self {
            timestamp,
            latitude,
            longitude,
        })
    }
}

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp, rejecting any other layout.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, NomenclatorError> {
    // chrono accepts single-digit fields and signed years, so check the shape first
    if !has_timestamp_shape(input) {
        return Err(NomenclatorError::parse(format!(
            "invalid timestamp '{input}': expected YYYY-MM-DDTHH:MM:SSZ"
        )));
    }

    let parsed = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .map_err(|e| NomenclatorError::parse(format!("invalid timestamp '{input}': {e}")))?;

    // chrono reads second 60 as a leap second
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(NomenclatorError::parse(format!(
            "invalid timestamp '{input}': second out of range"
        )));
    }

    Ok(parsed.and_utc())
}

fn has_timestamp_shape(input: &str) -> bool {
    const SHAPE: &[u8; 20] = b"dddd-dd-ddTdd:dd:ddZ";

    let bytes = input.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(byte, expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            other => byte == other,
        })
}

fn parse_coordinate(input: &str, name: &str) -> Result<f64, NomenclatorError> {
    let value = input
        .parse::<f64>()
        .map_err(|e| NomenclatorError::parse(format!("invalid {name} '{input}': {e}")))?;

    if !value.is_finite() {
        return Err(NomenclatorError::parse(format!(
            "invalid {name} '{input}': not a finite number"
        )));
    }

    Ok(value)
}
