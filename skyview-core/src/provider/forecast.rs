use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::WeatherError;

use super::{ForecastSource, truncate_body};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Open-Meteo forecast endpoint client.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

/// Forecast payload as returned by upstream; daily arrays are index-aligned.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub current: CurrentValues,
    pub daily: DailyValues,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentValues {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub wind_speed_10m: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyValues {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    #[instrument(skip(self), level = "info")]
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, WeatherError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("wind_speed_unit", "ms".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::ForecastUnavailable(format!("request failed: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::ForecastUnavailable(format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            warn!(%status, "forecast request rejected");
            return Err(WeatherError::ForecastUnavailable(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::ForecastUnavailable(format!("malformed forecast JSON: {e}"))
        })?;

        debug!(days = parsed.daily.time.len(), "forecast parsed");
        Ok(parsed)
    }
}
