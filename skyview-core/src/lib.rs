//! Core library for the `skyview` weather app.
//!
//! This crate defines:
//! - Geocoding and forecast clients for the Open-Meteo APIs
//! - The aggregation of both into a display-ready [`WeatherSnapshot`]
//! - Debounced autocomplete suggestions
//! - Persisted preferences (theme, search history) and the application state owner
//! - Configuration handling
//!
//! It is used by `skyview-cli`, but can also be reused by other front ends.

pub mod aggregator;
pub mod conditions;
pub mod config;
pub mod debounce;
pub mod error;
pub mod history;
pub mod location;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod state;
pub mod suggest;
pub mod units;

pub use aggregator::WeatherAggregator;
pub use conditions::{ConditionIcon, describe_weather_code};
pub use config::Config;
pub use error::WeatherError;
pub use history::HistoryManager;
pub use location::{LocationProvider, PositionOptions, StaticLocationProvider, locate};
pub use model::{
    Coordinates, CurrentConditions, DailyForecastEntry, Location, LocationLabel, Suggestion,
    Theme, WeatherSnapshot,
};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use provider::{ForecastSource, Geocoder, providers_from_config};
pub use state::{AppState, QueryOutcome, QueryToken};
pub use suggest::SuggestionFeed;
pub use units::{TemperatureUnit, format_temperature};
