use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    WeatherError,
    history::HistoryManager,
    model::{Theme, WeatherSnapshot},
    preferences::PreferenceStore,
    units::TemperatureUnit,
};

/// Identifies one issued lookup. Later queries carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The result replaced the displayed snapshot.
    Updated,
    /// A newer query was issued meanwhile; the result was discarded.
    Superseded,
}

/// Owner of everything the user sees: the current snapshot, search history,
/// theme and temperature unit.
#[derive(Debug)]
pub struct AppState {
    snapshot: Option<WeatherSnapshot>,
    history: HistoryManager,
    theme: Theme,
    unit: TemperatureUnit,
    latest_query: u64,
    store: Arc<dyn PreferenceStore>,
}

impl AppState {
    /// Read persisted preferences once; `fallback_theme` applies when none is stored.
    pub fn load(
        store: Arc<dyn PreferenceStore>,
        fallback_theme: Theme,
        unit: TemperatureUnit,
    ) -> Self {
        let theme = match store.load_theme() {
            Ok(Some(theme)) => theme,
            Ok(None) => fallback_theme,
            Err(e) => {
                warn!(error = %e, "failed to load theme preference");
                fallback_theme
            }
        };

        Self {
            snapshot: None,
            history: HistoryManager::load(Arc::clone(&store)),
            theme,
            unit,
            latest_query: 0,
            store,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Issue a token for a lookup about to start. It supersedes all earlier ones.
    pub fn begin_query(&mut self) -> QueryToken {
        self.latest_query += 1;
        QueryToken(self.latest_query)
    }

    pub fn is_latest(&self, token: QueryToken) -> bool {
        token.0 == self.latest_query
    }

    /// Publish the result of the lookup identified by `token`.
    ///
    /// Results of superseded queries are dropped, errors included. A failure of
    /// the latest query is returned and leaves the previous snapshot in place.
    pub fn complete(
        &mut self,
        token: QueryToken,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> Result<QueryOutcome, WeatherError> {
        if !self.is_latest(token) {
            debug!(?token, latest = self.latest_query, "discarding superseded result");
            return Ok(QueryOutcome::Superseded);
        }

        let snapshot = result?;
        let label = &snapshot.current.location_label;
        info!(label = %label, "snapshot updated");

        if label.is_named() {
            self.history.record(label.as_str());
        }
        self.snapshot = Some(snapshot);

        Ok(QueryOutcome::Updated)
    }

    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.store.save_theme(theme) {
            warn!(error = %e, "failed to save theme preference");
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn format_temperature(&self, temp_c: f64) -> String {
        self.unit.format(temp_c)
    }
}
