//! Place model returned by reverse geocoding

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a photo was taken, as resolved from its coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct PlaceDescriptor {
    /// City or region name used for the album title
    pub primary_name: String,
    /// Country name
    pub country: String,
}

impl PlaceDescriptor {
    /// Create a new place
    #[must_use]
    pub fn new(primary_name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            primary_name: primary_name.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for PlaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country.is_empty() {
            write!(f, "{}", self.primary_name)
        } else {
            write!(f, "{}, {}", self.primary_name, self.country)
        }
    }
}
