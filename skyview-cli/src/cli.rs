use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Select, Text};
use skyview_core::{
    AppState, Config, Coordinates, FilePreferenceStore, PositionOptions, QueryOutcome,
    StaticLocationProvider, SuggestionFeed, TemperatureUnit, Theme, WeatherAggregator,
    WeatherError, WeatherSnapshot, locate, providers_from_config,
};
use tracing::info;

use crate::{render, search};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Current weather and forecast for any city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the default unit and home coordinates.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show weather for the current position.
    Here {
        /// Latitude in degrees; defaults to the configured home.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees; defaults to the configured home.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long)]
        fahrenheit: bool,
    },

    /// Search for a city interactively, with suggestions as you type.
    Search {
        #[arg(long)]
        fahrenheit: bool,
    },

    /// List recent searches.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Show or change the theme preference.
    Theme {
        mode: Option<ThemeMode>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Forget all recent searches.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, fahrenheit } => {
                let city = city.trim();
                if city.is_empty() {
                    bail!("Please enter a city name");
                }
                let mut session = Session::open(fahrenheit)?;
                session.lookup_city(city).await
            }
            Command::Here {
                lat,
                lon,
                fahrenheit,
            } => {
                let mut session = Session::open(fahrenheit)?;
                let position = lat
                    .zip(lon)
                    .map(|(lat, lon)| Coordinates::new(lat, lon))
                    .or(session.config.home);
                session.lookup_here(position).await
            }
            Command::Search { fahrenheit } => {
                let mut session = Session::open(fahrenheit)?;
                let feed = Arc::new(SuggestionFeed::new(
                    session.aggregator.geocoder(),
                    session.config.suggestion_delay(),
                ));
                match search::prompt_city(feed).await? {
                    Some(city) => session.lookup_city(&city).await,
                    None => Ok(()),
                }
            }
            Command::History { action } => {
                let mut app = Session::load_state(&Config::load()?)?;
                match action {
                    Some(HistoryAction::Clear) => {
                        app.clear_history();
                        println!("Search history cleared.");
                    }
                    None => print!("{}", render::history(app.history())),
                }
                Ok(())
            }
            Command::Theme { mode } => {
                let mut app = Session::load_state(&Config::load()?)?;
                match mode {
                    Some(ThemeMode::Dark) => app.set_theme(Theme::Dark),
                    Some(ThemeMode::Light) => app.set_theme(Theme::Light),
                    Some(ThemeMode::Toggle) => {
                        app.toggle_theme();
                    }
                    None => {}
                }
                println!("Theme: {}", app.theme());
                Ok(())
            }
        }
    }
}

/// Services plus state for one invocation.
struct Session {
    config: Config,
    aggregator: WeatherAggregator,
    app: AppState,
}

impl Session {
    fn open(fahrenheit: bool) -> anyhow::Result<Self> {
        let config = Config::load()?;
        let (geocoder, forecast) = providers_from_config(&config)?;
        let mut app = Self::load_state(&config)?;
        if fahrenheit && app.unit().is_celsius() {
            app.toggle_unit();
        }

        Ok(Self {
            aggregator: WeatherAggregator::new(geocoder, forecast),
            config,
            app,
        })
    }

    fn load_state(config: &Config) -> anyhow::Result<AppState> {
        let store = FilePreferenceStore::open_default()?;
        info!(path = %store.path().display(), "using preferences file");
        Ok(AppState::load(Arc::new(store), Theme::default(), config.units))
    }

    async fn lookup_city(&mut self, city: &str) -> anyhow::Result<()> {
        let token = self.app.begin_query();
        let result = self.aggregator.by_city_name(city).await;
        let outcome = self.app.complete(token, result);
        self.publish(outcome)
    }

    async fn lookup_here(&mut self, coords: Option<Coordinates>) -> anyhow::Result<()> {
        let provider = StaticLocationProvider::new(coords);
        let coords = match locate(&provider, &PositionOptions::default()).await {
            Ok(coords) => coords,
            Err(e) => {
                eprintln!("Tip: `skyview show <CITY>` still works without a position.");
                return Err(user_facing(e));
            }
        };

        let token = self.app.begin_query();
        let result = self
            .aggregator
            .by_coordinates(coords.latitude, coords.longitude)
            .await;
        let outcome = self.app.complete(token, result);
        self.publish(outcome)
    }

    fn publish(&self, outcome: Result<QueryOutcome, WeatherError>) -> anyhow::Result<()> {
        outcome.map_err(user_facing)?;
        if let Some(snapshot) = self.app.snapshot() {
            self.print(snapshot);
        }
        Ok(())
    }

    fn print(&self, snapshot: &WeatherSnapshot) {
        print!(
            "{}",
            render::snapshot(snapshot, self.app.unit(), self.app.theme())
        );
    }
}

fn user_facing(e: WeatherError) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let units = Select::new("Default temperature unit:", TemperatureUnit::all().to_vec())
        .prompt()
        .context("Unit selection aborted")?;
    config.set_units(units);

    let current_home = config
        .home
        .map(|h| format!("{},{}", h.latitude, h.longitude))
        .unwrap_or_default();
    let home = Text::new("Home coordinates as \"lat,lon\" (empty for none):")
        .with_initial_value(&current_home)
        .prompt()
        .context("Home coordinates prompt aborted")?;
    config.set_home(parse_coordinates(&home)?);

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// Parse `"lat,lon"`; blank input means no coordinates.
fn parse_coordinates(input: &str) -> anyhow::Result<Option<Coordinates>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("Expected \"lat,lon\", got '{input}'"))?;
    let latitude: f64 = lat.trim().parse().context("Invalid latitude")?;
    let longitude: f64 = lon.trim().parse().context("Invalid longitude")?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        bail!("Coordinates out of range: {latitude},{longitude}");
    }

    Ok(Some(Coordinates::new(latitude, longitude)))
}
