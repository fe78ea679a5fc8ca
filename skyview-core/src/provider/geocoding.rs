use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{WeatherError, model::Location};

use super::{Geocoder, truncate_body};

/// Open-Meteo geocoding endpoint client.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<Vec<Location>, WeatherError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                WeatherError::GeocodingUnavailable(format!("request failed: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::GeocodingUnavailable(format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            warn!(%status, "geocoding request rejected");
            return Err(WeatherError::GeocodingUnavailable(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: GeoResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::GeocodingUnavailable(format!("malformed geocoding JSON: {e}"))
        })?;

        let locations: Vec<Location> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        debug!(count = locations.len(), "geocoding results parsed");
        Ok(locations)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeoResult> for Location {
    fn from(r: GeoResult) -> Self {
        Location {
            name: r.name,
            country: r.country.unwrap_or_default(),
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self), level = "info")]
    async fn search_by_name(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Location>, WeatherError> {
        let mut locations = self
            .fetch(&[("name", query.to_string()), ("count", limit.to_string())])
            .await?;
        locations.truncate(limit as usize);
        Ok(locations)
    }

    #[instrument(skip(self), level = "info")]
    async fn resolve_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, WeatherError> {
        let locations = self
            .fetch(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("count", "1".to_string()),
            ])
            .await?;
        Ok(locations.into_iter().next())
    }
}
