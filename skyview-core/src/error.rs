use thiserror::Error;

/// Failures of the weather lookup pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// Transport or HTTP failure while talking to the geocoding endpoint.
    #[error("Geocoding service unavailable: {0}")]
    GeocodingUnavailable(String),

    /// The geocoder answered, but had no match for the query.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Transport, HTTP or payload failure while retrieving a forecast.
    #[error("Forecast service unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

impl WeatherError {
    /// Alert text for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationNotFound(_) => "City not found".to_string(),
            Self::GeocodingUnavailable(_) | Self::ForecastUnavailable(_) => {
                "Unable to fetch weather data".to_string()
            }
            Self::PermissionDenied => "Location permission denied".to_string(),
            Self::PositionUnavailable(_) => "Unable to get current location".to_string(),
        }
    }

    /// Whether callers degrade locally instead of surfacing this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::GeocodingUnavailable(_))
    }
}
