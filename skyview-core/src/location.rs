//! Device position sources.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{WeatherError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest acceptable fix.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(10),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn request_permission(&self) -> Permission;

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, WeatherError>;
}

/// Ask for permission, then for a fresh position within `options.timeout`.
pub async fn locate(
    provider: &dyn LocationProvider,
    options: &PositionOptions,
) -> Result<Coordinates, WeatherError> {
    if provider.request_permission().await == Permission::Denied {
        warn!("location permission denied");
        return Err(WeatherError::PermissionDenied);
    }

    let position = tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| {
            WeatherError::PositionUnavailable(format!(
                "no position within {}s",
                options.timeout.as_secs()
            ))
        })??;

    let age = Utc::now()
        .signed_duration_since(position.timestamp)
        .to_std()
        .unwrap_or_default();
    if age > options.maximum_age {
        return Err(WeatherError::PositionUnavailable(format!(
            "position is {}s old",
            age.as_secs()
        )));
    }

    info!(
        latitude = position.coords.latitude,
        longitude = position.coords.longitude,
        "position acquired"
    );
    Ok(position.coords)
}

/// Reports a fixed position, typically the configured home coordinates.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationProvider {
    coords: Option<Coordinates>,
}

impl StaticLocationProvider {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, WeatherError> {
        self.coords
            .map(|coords| Position {
                coords,
                timestamp: Utc::now(),
            })
            .ok_or_else(|| {
                WeatherError::PositionUnavailable("no position configured".to_string())
            })
    }
}
