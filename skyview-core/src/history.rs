use std::sync::Arc;

use tracing::warn;

use crate::preferences::PreferenceStore;

/// Maximum number of remembered searches.
pub const HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of searched location labels, without duplicates.
///
/// Every mutation is persisted before returning. A persistence failure is
/// logged and the in-memory list keeps the change for the current session.
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<String>,
    store: Arc<dyn PreferenceStore>,
}

impl HistoryManager {
    /// Read the persisted list once; unreadable state starts empty.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let mut entries = store.load_history().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load search history");
            Vec::new()
        });
        entries.truncate(HISTORY_LIMIT);
        Self { entries, store }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `label` to the front (exact, case-sensitive match) and keep the newest entries.
    pub fn record(&mut self, label: &str) {
        self.entries.retain(|existing| existing != label);
        self.entries.insert(0, label.to_string());
        self.entries.truncate(HISTORY_LIMIT);

        if let Err(e) = self.store.save_history(&self.entries) {
            warn!(error = %e, label, "failed to persist search history");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();

        if let Err(e) = self.store.clear_history() {
            warn!(error = %e, "failed to clear persisted search history");
        }
    }
}
