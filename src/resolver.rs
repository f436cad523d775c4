//! Lookup services used to enrich a photo
//!
//! The processor only depends on these traits, so the HTTP clients in
//! [`crate::locator`] and [`crate::weather`] can be swapped for test doubles.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{PlaceDescriptor, WeatherSummary};

/// Reverse geocoding: coordinates to a place
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    async fn locate(&self, latitude: f64, longitude: f64) -> Result<PlaceDescriptor>;
}

/// Historical weather for a place on a given date
#[async_trait]
pub trait WeatherResolver: Send + Sync {
    async fn check_weather(
        &self,
        latitude: f64,
        longitude: f64,
        date: DateTime<Utc>,
    ) -> Result<WeatherSummary>;
}
