//! Reverse geocoding client for the positionstack API

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::{LOCATOR_API_KEY_VAR, LocatorConfig};
use crate::http;
use crate::models::PlaceDescriptor;
use crate::resolver::PlaceResolver;
use crate::NomenclatorError;

const SERVICE: &str = "positionstack";

/// Resolves coordinates to a region and country
pub struct PositionstackLocator {
    client: Client,
    api_key: String,
    base_url: String,
    limit: u32,
}

/// Reverse geocoding response
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    data: Vec<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl ReverseResult {
    fn into_place(self) -> Option<PlaceDescriptor> {
        let primary_name = self.region.filter(|r| !r.is_empty())?;
        Some(PlaceDescriptor::new(
            primary_name,
            self.country.unwrap_or_default(),
        ))
    }
}

impl PositionstackLocator {
    /// Create a new client from configuration
    pub fn new(config: &LocatorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                NomenclatorError::config(format!("{LOCATOR_API_KEY_VAR} env var not set"))
            })?;

        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Reverse geocoding URL for the given coordinates
    #[must_use]
    pub fn request_url(&self, latitude: f64, longitude: f64) -> String {
        let query = format!("{latitude:.6},{longitude:.6}");
        let mut url = format!(
            "{}/reverse?access_key={}&query={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query)
        );
        if self.limit != 0 {
            url.push_str(&format!("&limit={}", self.limit));
        }
        url
    }
}

#[async_trait]
impl PlaceResolver for PositionstackLocator {
    #[instrument(skip(self))]
    async fn locate(&self, latitude: f64, longitude: f64) -> Result<PlaceDescriptor> {
        let url = self.request_url(latitude, longitude);
        let response: ReverseResponse = http::get_json(&self.client, SERVICE, &url).await?;

        let first = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no place found for {latitude:.6},{longitude:.6}"))?;

        debug!(
            "Reverse geocoded to {:?} ({:?})",
            first.label.as_deref().or(first.locality.as_deref()),
            first.region
        );

        first
            .into_place()
            .ok_or_else(|| anyhow!("place for {latitude:.6},{longitude:.6} has no region"))
    }
}
