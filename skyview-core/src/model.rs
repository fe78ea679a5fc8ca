use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of daily entries shown in the outlook.
pub const OUTLOOK_DAYS: usize = 5;

/// A named place resolved by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// `"{name}, {country}"`, or just the name when upstream omitted the country.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Autocomplete entries share the shape of a resolved location.
pub type Suggestion = Location;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Display label of a snapshot.
///
/// Only `Named` labels are user-searchable and therefore eligible for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationLabel {
    Named(String),
    Coordinates(String),
}

impl LocationLabel {
    pub fn named(location: &Location) -> Self {
        Self::Named(location.label())
    }

    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates(format!("{latitude:.2}°, {longitude:.2}°"))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(s) | Self::Coordinates(s) => s,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for LocationLabel {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_label: LocationLabel,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
    pub condition_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// UTC midnight of the forecast day.
    pub epoch_seconds: i64,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub condition_text: String,
}

/// Current conditions plus the daily forecast, both from one forecast response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

impl WeatherSnapshot {
    /// The leading days that are displayed.
    pub fn outlook(&self) -> &[DailyForecastEntry] {
        let end = self.daily.len().min(OUTLOOK_DAYS);
        &self.daily[..end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(anyhow::anyhow!(
                "Unknown theme '{value}'. Supported themes: dark, light."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Location {
        Location {
            name: "Paris".into(),
            country: "France".into(),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    fn day(epoch_seconds: i64) -> DailyForecastEntry {
        DailyForecastEntry {
            epoch_seconds,
            temp_max_c: 10.0,
            temp_min_c: 2.0,
            condition_text: "Overcast".into(),
        }
    }

    #[test]
    fn named_label_joins_name_and_country() {
        let label = LocationLabel::named(&paris());
        assert_eq!(label, "Paris, France");
        assert!(label.is_named());
    }

    #[test]
    fn named_label_without_country_is_just_the_name() {
        let mut loc = paris();
        loc.country.clear();
        assert_eq!(LocationLabel::named(&loc).as_str(), "Paris");
    }

    #[test]
    fn coordinate_label_uses_two_decimals() {
        let label = LocationLabel::from_coordinates(10.0, 20.0);
        assert_eq!(label.to_string(), "10.00°, 20.00°");
        assert!(!label.is_named());

        let label = LocationLabel::from_coordinates(-33.8688, 151.2093);
        assert_eq!(label.as_str(), "-33.87°, 151.21°");
    }

    #[test]
    fn label_kind_survives_serialization() {
        let coords = LocationLabel::from_coordinates(10.0, 20.0);
        let json = serde_json::to_string(&coords).expect("serialize");
        let back: LocationLabel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, coords);
        assert!(!back.is_named());

        let named = LocationLabel::named(&paris());
        let json = serde_json::to_string(&named).expect("serialize");
        let back: LocationLabel = serde_json::from_str(&json).expect("deserialize");
        assert!(back.is_named());
        assert_eq!(back, "Paris, France");
    }

    #[test]
    fn outlook_is_capped_at_five_days() {
        let snapshot = WeatherSnapshot {
            current: CurrentConditions {
                location_label: LocationLabel::named(&paris()),
                temperature_c: 12.0,
                humidity_percent: 70.0,
                wind_speed_mps: 3.0,
                condition_text: "Clear sky".into(),
            },
            daily: (0..7).map(|i| day(i * 86_400)).collect(),
        };

        let outlook = snapshot.outlook();
        assert_eq!(outlook.len(), 5);
        assert_eq!(outlook[0].epoch_seconds, 0);
        assert_eq!(outlook[4].epoch_seconds, 4 * 86_400);
    }

    #[test]
    fn theme_parses_and_toggles() {
        assert_eq!(Theme::try_from("Dark").expect("dark parses"), Theme::Dark);
        assert!(Theme::try_from("sepia").is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().as_str(), "dark");
    }
}
