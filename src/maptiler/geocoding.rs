//! Reverse geocoding through the MapTiler geocoding API

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://api.maptiler.com";

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a short place name ("District, City") for a coordinate.
    async fn place_name(&self, latitude: f64, longitude: f64) -> Result<String, Error>;
}

#[derive(Debug, Deserialize)]
struct Feature {
    place_name: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<Feature>,
}

pub struct MapTilerGeocoder {
    client: Client,
    api_url: String,
    api_key: String,
    language: String,
}

impl MapTilerGeocoder {
    pub fn new(api_key: &str) -> Self {
        Self::with_api_url(DEFAULT_API_URL, api_key)
    }

    pub fn with_api_url(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            language: String::from("id"),
        }
    }
}

#[async_trait]
impl Geocoder for MapTilerGeocoder {
    async fn place_name(&self, latitude: f64, longitude: f64) -> Result<String, Error> {
        // MapTiler wants longitude first
        let mut url = Url::parse(&format!(
            "{}/geocoding/{},{}.json",
            self.api_url.trim_end_matches('/'),
            longitude,
            latitude
        ))?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("language", &self.language)
            .append_pair("limit", "1");

        let resp: GeocodingResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let feature = resp
            .features
            .first()
            .ok_or_else(|| anyhow!("No place found for {}, {}", latitude, longitude))?;

        Ok(short_place_name(&feature.place_name))
    }
}

/// Keep the last two components of a fully qualified place name,
/// which is usually the city and the province.
fn short_place_name(place_name: &str) -> String {
    let parts: Vec<&str> = place_name.split(", ").collect();
    let start = parts.len().saturating_sub(2);
    parts[start..].join(", ")
}
