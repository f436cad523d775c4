//! Historical weather client for the Visual Crossing timeline API

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::{WEATHER_API_KEY_VAR, WeatherConfig};
use crate::http;
use crate::models::WeatherSummary;
use crate::resolver::WeatherResolver;
use crate::NomenclatorError;

const SERVICE: &str = "visualcrossing";

/// Looks up the conditions reported for a place on a given day
pub struct VisualCrossingWeatherman {
    client: Client,
    api_key: String,
    base_url: String,
    elements: Vec<String>,
    unit_group: String,
}

/// `VisualCrossing` timeline response structures
mod visualcrossing {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct TimelineResponse {
        #[serde(default)]
        pub days: Vec<Day>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Day {
        #[serde(rename = "datetime")]
        pub date: Option<String>,
        #[serde(rename = "datetimeEpoch")]
        pub epoch: Option<i64>,
        pub conditions: Option<String>,
    }
}

impl VisualCrossingWeatherman {
    /// Create a new client from configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                NomenclatorError::config(format!("{WEATHER_API_KEY_VAR} env var not set"))
            })?;

        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            elements: config.elements.clone(),
            unit_group: config.unit_group.clone(),
        })
    }

    /// Timeline URL covering the single UTC day of `date`
    #[must_use]
    pub fn request_url(&self, latitude: f64, longitude: f64, date: DateTime<Utc>) -> String {
        let location = format!("{latitude:.6},{longitude:.6}");
        let day = date.format("%Y-%m-%d");

        format!(
            "{}/timeline/{}/{day}/{day}?unitGroup={}&elements={}&include=obs%2Cdays&key={}&options=nonulls&contentType=json",
            self.base_url,
            urlencoding::encode(&location),
            urlencoding::encode(&self.unit_group),
            urlencoding::encode(&self.elements.join(",")),
            urlencoding::encode(&self.api_key),
        )
    }
}

#[async_trait]
impl WeatherResolver for VisualCrossingWeatherman {
    #[instrument(skip(self))]
    async fn check_weather(
        &self,
        latitude: f64,
        longitude: f64,
        date: DateTime<Utc>,
    ) -> Result<WeatherSummary> {
        let url = self.request_url(latitude, longitude, date);
        let response: visualcrossing::TimelineResponse =
            http::get_json(&self.client, SERVICE, &url).await?;

        let day = response
            .days
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no weather data for {}", date.format("%Y-%m-%d")))?;

        debug!(
            "Weather for {:?} (epoch {:?}): {:?}",
            day.date, day.epoch, day.conditions
        );

        Ok(WeatherSummary::new(day.conditions.unwrap_or_default()))
    }
}
