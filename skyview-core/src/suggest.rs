use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{debounce::Debouncer, model::Suggestion, provider::Geocoder};

/// Inputs shorter than this clear the list without a lookup.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum suggestions requested per lookup.
pub const SUGGESTION_LIMIT: u32 = 5;

/// Best-effort autocomplete over the geocoder.
///
/// Each input event re-arms a debounce timer; only the text present after a
/// quiet window is looked up. Lookup failures empty the list.
#[derive(Debug)]
pub struct SuggestionFeed {
    geocoder: Arc<dyn Geocoder>,
    debouncer: Debouncer,
    tx: Arc<watch::Sender<Vec<Suggestion>>>,
}

impl SuggestionFeed {
    pub fn new(geocoder: Arc<dyn Geocoder>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            geocoder,
            debouncer: Debouncer::new(delay),
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Vec<Suggestion> {
        self.tx.borrow().clone()
    }

    /// React to the text field changing to `text`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, text: &str) {
        if text.chars().count() < MIN_QUERY_CHARS {
            self.debouncer.cancel();
            self.tx.send_replace(Vec::new());
            return;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let tx = Arc::clone(&self.tx);
        let query = text.to_string();

        self.debouncer.schedule(async move {
            let suggestions = match geocoder.search_by_name(&query, SUGGESTION_LIMIT).await {
                Ok(found) => {
                    debug!(query = %query, count = found.len(), "suggestions fetched");
                    found
                }
                Err(e) => {
                    warn!(error = %e, query = %query, "suggestion lookup failed");
                    Vec::new()
                }
            };
            tx.send_replace(suggestions);
        });
    }

    /// Drop any pending lookup and empty the list, e.g. after a selection.
    pub fn clear(&self) {
        self.debouncer.cancel();
        self.tx.send_replace(Vec::new());
    }
}
