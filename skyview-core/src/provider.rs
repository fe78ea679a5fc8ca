use std::{fmt::Debug, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use crate::{Config, WeatherError, model::Location};

pub mod forecast;
pub mod geocoding;

pub use forecast::{ForecastResponse, OpenMeteoForecast};
pub use geocoding::OpenMeteoGeocoder;

/// Forward and reverse lookup of named places.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Up to `limit` matches for a free-text place name. No match is an empty list.
    async fn search_by_name(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Location>, WeatherError>;

    /// The nearest named place, or `None` when upstream knows of none.
    async fn resolve_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, WeatherError>;
}

/// Current conditions and daily aggregates for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, WeatherError>;
}

/// Shared HTTP client honouring the configured request timeout.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!("skyview/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the geocoder and forecast source configured for this installation.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn Geocoder>, Arc<dyn ForecastSource>)> {
    let http = http_client(config)?;

    let geocoder: Arc<dyn Geocoder> =
        Arc::new(OpenMeteoGeocoder::new(config.geocoding_url.clone(), http.clone()));
    let forecast: Arc<dyn ForecastSource> =
        Arc::new(OpenMeteoForecast::new(config.forecast_url.clone(), http));

    Ok((geocoder, forecast))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
