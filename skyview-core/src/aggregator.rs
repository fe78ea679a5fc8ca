//! Geocoding plus forecast retrieval, reshaped into a [`WeatherSnapshot`].
//!
//! The aggregator is stateless: it never touches the displayed snapshot or the
//! search history. Publishing a result is the job of [`crate::AppState`].

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    WeatherError,
    conditions::describe_weather_code,
    model::{CurrentConditions, DailyForecastEntry, LocationLabel, WeatherSnapshot},
    provider::{ForecastResponse, ForecastSource, Geocoder},
};

#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
}

impl WeatherAggregator {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastSource>) -> Self {
        Self { geocoder, forecast }
    }

    pub fn geocoder(&self) -> Arc<dyn Geocoder> {
        Arc::clone(&self.geocoder)
    }

    /// Look up a place by name and fetch its weather.
    ///
    /// Fails with `LocationNotFound` when the geocoder has no match, and with
    /// `GeocodingUnavailable`/`ForecastUnavailable` when either call fails.
    pub async fn by_city_name(&self, name: &str) -> Result<WeatherSnapshot, WeatherError> {
        info!(city = name, "looking up weather by city name");

        let location = self
            .geocoder
            .search_by_name(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))?;

        info!(label = %location.label(), "city resolved");

        let raw = self
            .forecast
            .get_forecast(location.latitude, location.longitude)
            .await?;

        build_snapshot(LocationLabel::named(&location), raw)
    }

    /// Fetch weather for raw coordinates, labelling it by the nearest named place.
    ///
    /// A failed or empty reverse lookup degrades to a coordinate label; only a
    /// forecast failure is fatal.
    pub async fn by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        info!(latitude, longitude, "looking up weather by coordinates");

        let label = match self
            .geocoder
            .resolve_by_coordinates(latitude, longitude)
            .await
        {
            Ok(Some(location)) => LocationLabel::named(&location),
            Ok(None) => LocationLabel::from_coordinates(latitude, longitude),
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed, using coordinate label");
                LocationLabel::from_coordinates(latitude, longitude)
            }
        };

        let raw = self.forecast.get_forecast(latitude, longitude).await?;

        build_snapshot(label, raw)
    }
}

/// Reshape one forecast response into a snapshot, preserving upstream day order.
pub fn build_snapshot(
    location_label: LocationLabel,
    raw: ForecastResponse,
) -> Result<WeatherSnapshot, WeatherError> {
    let current = CurrentConditions {
        location_label,
        temperature_c: raw.current.temperature_2m,
        humidity_percent: raw.current.relative_humidity_2m,
        wind_speed_mps: raw.current.wind_speed_10m,
        condition_text: describe_weather_code(raw.current.weather_code).to_string(),
    };

    let daily = raw.daily;
    let days = daily.time.len();
    if daily.weather_code.len() != days
        || daily.temperature_2m_max.len() != days
        || daily.temperature_2m_min.len() != days
    {
        return Err(WeatherError::ForecastUnavailable(format!(
            "daily arrays are not aligned: {} dates, {} codes, {} maxima, {} minima",
            days,
            daily.weather_code.len(),
            daily.temperature_2m_max.len(),
            daily.temperature_2m_min.len(),
        )));
    }

    let entries = daily
        .time
        .iter()
        .zip(&daily.weather_code)
        .zip(daily.temperature_2m_max.iter().zip(&daily.temperature_2m_min))
        .map(|((date, &code), (&max, &min))| -> Result<_, WeatherError> {
            Ok(DailyForecastEntry {
                epoch_seconds: date_to_epoch(date)?,
                temp_max_c: max,
                temp_min_c: min,
                condition_text: describe_weather_code(code).to_string(),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(WeatherSnapshot {
        current,
        daily: entries,
    })
}

/// `YYYY-MM-DD` to the epoch seconds of that day's UTC midnight.
fn date_to_epoch(date: &str) -> Result<i64, WeatherError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        WeatherError::ForecastUnavailable(format!("invalid forecast date '{date}': {e}"))
    })?;

    day.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| WeatherError::ForecastUnavailable(format!("invalid forecast date '{date}'")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Location;
    use crate::provider::forecast::{CurrentValues, DailyValues};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Canned geocoder that records every call it receives.
    #[derive(Debug, Default)]
    pub(crate) struct StubGeocoder {
        pub results: Vec<Location>,
        pub fail: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubGeocoder {
        pub fn with(results: Vec<Location>) -> Self {
            Self {
                results,
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn search_by_name(
            &self,
            query: &str,
            limit: u32,
        ) -> Result<Vec<Location>, WeatherError> {
            self.calls.lock().push(query.to_string());
            if self.fail {
                return Err(WeatherError::GeocodingUnavailable("stub".into()));
            }
            Ok(self.results.iter().take(limit as usize).cloned().collect())
        }

        async fn resolve_by_coordinates(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<Option<Location>, WeatherError> {
            self.calls.lock().push(format!("{latitude},{longitude}"));
            if self.fail {
                return Err(WeatherError::GeocodingUnavailable("stub".into()));
            }
            Ok(self.results.first().cloned())
        }
    }

    #[derive(Debug)]
    pub(crate) struct StubForecast {
        pub response: Option<ForecastResponse>,
        pub calls: Mutex<Vec<(f64, f64)>>,
    }

    impl StubForecast {
        pub fn with(response: ForecastResponse) -> Self {
            Self {
                response: Some(response),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ForecastSource for StubForecast {
        async fn get_forecast(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<ForecastResponse, WeatherError> {
            self.calls.lock().push((latitude, longitude));
            self.response
                .clone()
                .ok_or_else(|| WeatherError::ForecastUnavailable("stub".into()))
        }
    }

    pub(crate) fn paris() -> Location {
        Location {
            name: "Paris".into(),
            country: "France".into(),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    pub(crate) fn forecast(current_code: i32) -> ForecastResponse {
        ForecastResponse {
            current: CurrentValues {
                temperature_2m: 18.4,
                relative_humidity_2m: 62.0,
                wind_speed_10m: 3.1,
                weather_code: current_code,
            },
            daily: DailyValues {
                time: vec!["2024-01-01".into(), "2024-01-02".into(), "2024-01-03".into()],
                weather_code: vec![0, 61, 95],
                temperature_2m_max: vec![10.0, 11.0, 12.0],
                temperature_2m_min: vec![1.0, 2.0, 3.0],
            },
        }
    }

    fn aggregator(
        geo: StubGeocoder,
        fc: StubForecast,
    ) -> (WeatherAggregator, Arc<StubGeocoder>, Arc<StubForecast>) {
        let geo = Arc::new(geo);
        let fc = Arc::new(fc);
        (WeatherAggregator::new(geo.clone(), fc.clone()), geo, fc)
    }

    #[tokio::test]
    async fn city_lookup_builds_named_snapshot() {
        let (agg, _, fc) =
            aggregator(StubGeocoder::with(vec![paris()]), StubForecast::with(forecast(0)));

        let snapshot = agg.by_city_name("Paris").await.expect("lookup succeeds");

        assert_eq!(
            snapshot.current.location_label,
            LocationLabel::Named("Paris, France".into())
        );
        assert_eq!(snapshot.current.condition_text, "Clear sky");
        assert_eq!(snapshot.current.temperature_c, 18.4);
        assert_eq!(fc.calls.lock().as_slice(), &[(48.85, 2.35)]);
    }

    #[tokio::test]
    async fn unknown_city_is_location_not_found_without_forecast_call() {
        let (agg, _, fc) = aggregator(StubGeocoder::with(vec![]), StubForecast::with(forecast(0)));

        let err = agg.by_city_name("Zzzzznotacity").await.unwrap_err();

        assert_eq!(err, WeatherError::LocationNotFound("Zzzzznotacity".into()));
        assert!(fc.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn city_lookup_propagates_forecast_failure() {
        let (agg, _, _) = aggregator(StubGeocoder::with(vec![paris()]), StubForecast::failing());
        let err = agg.by_city_name("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::ForecastUnavailable(_)));
    }

    #[tokio::test]
    async fn city_lookup_propagates_geocoding_failure() {
        let (agg, _, _) = aggregator(StubGeocoder::failing(), StubForecast::with(forecast(0)));
        let err = agg.by_city_name("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::GeocodingUnavailable(_)));
    }

    #[tokio::test]
    async fn coordinates_without_match_use_coordinate_label() {
        let (agg, _, _) = aggregator(StubGeocoder::with(vec![]), StubForecast::with(forecast(3)));

        let snapshot = agg.by_coordinates(10.0, 20.0).await.expect("lookup succeeds");

        assert_eq!(snapshot.current.location_label, "10.00°, 20.00°");
        assert!(!snapshot.current.location_label.is_named());
        assert_eq!(snapshot.current.condition_text, "Overcast");
    }

    #[tokio::test]
    async fn reverse_geocoding_failure_degrades_to_coordinate_label() {
        let (agg, _, fc) = aggregator(StubGeocoder::failing(), StubForecast::with(forecast(0)));

        let snapshot = agg.by_coordinates(-33.87, 151.21).await.expect("lookup succeeds");

        assert_eq!(snapshot.current.location_label.as_str(), "-33.87°, 151.21°");
        assert_eq!(fc.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn coordinates_with_match_use_named_label() {
        let (agg, geo, _) =
            aggregator(StubGeocoder::with(vec![paris()]), StubForecast::with(forecast(0)));

        let snapshot = agg.by_coordinates(48.85, 2.35).await.expect("lookup succeeds");

        assert!(snapshot.current.location_label.is_named());
        assert_eq!(snapshot.current.location_label, "Paris, France");
        assert_eq!(geo.call_count(), 1);
    }

    #[tokio::test]
    async fn coordinate_lookup_forecast_failure_is_fatal() {
        let (agg, _, _) = aggregator(StubGeocoder::with(vec![paris()]), StubForecast::failing());
        let err = agg.by_coordinates(48.85, 2.35).await.unwrap_err();
        assert!(matches!(err, WeatherError::ForecastUnavailable(_)));
    }

    #[test]
    fn daily_entries_keep_upstream_order() {
        let snapshot =
            build_snapshot(LocationLabel::named(&paris()), forecast(0)).expect("valid payload");

        let epochs: Vec<i64> = snapshot.daily.iter().map(|d| d.epoch_seconds).collect();
        assert_eq!(epochs, vec![1_704_067_200, 1_704_153_600, 1_704_240_000]);

        let max: Vec<f64> = snapshot.daily.iter().map(|d| d.temp_max_c).collect();
        let min: Vec<f64> = snapshot.daily.iter().map(|d| d.temp_min_c).collect();
        assert_eq!(max, vec![10.0, 11.0, 12.0]);
        assert_eq!(min, vec![1.0, 2.0, 3.0]);

        let conditions: Vec<&str> = snapshot
            .daily
            .iter()
            .map(|d| d.condition_text.as_str())
            .collect();
        assert_eq!(conditions, vec!["Clear sky", "Slight rain", "Thunderstorm"]);
    }

    #[test]
    fn misaligned_daily_arrays_are_rejected() {
        let mut raw = forecast(0);
        raw.daily.temperature_2m_min.pop();

        let err = build_snapshot(LocationLabel::named(&paris()), raw).unwrap_err();
        assert!(matches!(err, WeatherError::ForecastUnavailable(ref m) if m.contains("aligned")));
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let mut raw = forecast(0);
        raw.daily.time[1] = "tomorrow".into();

        let err = build_snapshot(LocationLabel::named(&paris()), raw).unwrap_err();
        assert!(matches!(err, WeatherError::ForecastUnavailable(ref m) if m.contains("tomorrow")));
    }
}
