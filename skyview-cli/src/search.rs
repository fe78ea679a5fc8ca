use std::sync::Arc;

use inquire::{
    CustomUserError, Text,
    autocompletion::{Autocomplete, Replacement},
};
use skyview_core::{Suggestion, SuggestionFeed};
use tokio::runtime::Handle;

/// Feeds every keystroke to the debounced suggestion feed and offers the
/// latest published suggestions.
#[derive(Clone)]
struct CityAutocomplete {
    feed: Arc<SuggestionFeed>,
    runtime: Handle,
}

impl Autocomplete for CityAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let _guard = self.runtime.enter();
        self.feed.on_input(input);
        Ok(matching_labels(&self.feed.current(), input))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Labels of published suggestions that still fit the typed text.
///
/// The feed publishes after the debounce window, so the current list may
/// belong to an earlier, shorter input.
fn matching_labels(suggestions: &[Suggestion], input: &str) -> Vec<String> {
    let typed = input.trim().to_lowercase();
    suggestions
        .iter()
        .filter(|s| s.name.to_lowercase().starts_with(&typed))
        .map(|s| s.label())
        .collect()
}

/// Prompt for a city. Returns the place name to look up, or `None` if skipped.
///
/// A picked suggestion resolves to its place name, as typed text does.
pub async fn prompt_city(feed: Arc<SuggestionFeed>) -> anyhow::Result<Option<String>> {
    let completer = CityAutocomplete {
        feed: Arc::clone(&feed),
        runtime: Handle::current(),
    };

    let answer = tokio::task::spawn_blocking(move || {
        Text::new("City:")
            .with_placeholder("Search for a city")
            .with_autocomplete(completer)
            .prompt_skippable()
    })
    .await??;

    let Some(answer) = answer else {
        return Ok(None);
    };
    let text = answer.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let picked = feed.current().into_iter().find(|s| s.label() == text);
    feed.clear();

    Ok(Some(picked.map(|s| s.name).unwrap_or_else(|| text.to_string())))
}
