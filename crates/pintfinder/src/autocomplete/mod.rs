//! Address-search-as-you-type.
//!
//! [`SearchQueryController`] owns one autocomplete session: the query text,
//! the single pending debounce deadline, a monotonic request sequence, the
//! suggestion list and the keyboard cursor. It is a synchronous state
//! machine; the async glue that actually talks to the geocoder lives in
//! [`driver`].
//!
//! Two guards keep the visible suggestions consistent under arbitrary
//! network completion order:
//! - the debounce deadline is cancel-and-rescheduled on every keystroke, so
//!   at most one fetch is issued per idle period;
//! - every fetch carries a sequence number, and a response is discarded
//!   unless its sequence equals the newest issued one. Superseded requests
//!   are never aborted mid-flight; their results are simply dropped here.

use tokio::time::Instant;
use tracing::{debug, warn};

use pintfinder_geo::{AddressSuggestion, GeocodeError, derive_suburb};

use crate::{config::DiscoveryConfig, model::ResolvedAddress};

pub mod driver;

pub use driver::{Autocomplete, InputEvent, OutputEvent};

/// Keys the autocomplete input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// What a keystroke did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Nothing to do (e.g. arrows with an empty suggestion list).
    Ignored,
    /// The active cursor moved to this index.
    CursorMoved(usize),
    /// Escape cleared the suggestion list.
    Cleared,
    /// Enter committed the active suggestion.
    Committed(ResolvedAddress),
}

/// A fetch the driver should issue against the geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    /// Monotonic tag compared against the session when the response lands.
    pub sequence: u64,
    pub query: String,
    pub limit: usize,
    pub country: Option<String>,
}

/// Per-input autocomplete state. At most one debounce deadline is pending at
/// any time.
#[derive(Debug, Default)]
struct SearchSession {
    query: String,
    suggestions: Vec<AddressSuggestion>,
    active: Option<usize>,
    deadline: Option<Instant>,
    last_issued: u64,
}

/// Controller for one autocomplete text box.
#[derive(Debug)]
pub struct SearchQueryController {
    session: SearchSession,
    debounce: std::time::Duration,
    min_query_len: usize,
    limit: usize,
    country: Option<String>,
}

impl SearchQueryController {
    #[must_use]
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            session: SearchSession::default(),
            debounce: config.debounce,
            min_query_len: config.min_query_len,
            limit: config.suggestion_limit,
            country: config.country.clone(),
        }
    }

    /// Record a keystroke's worth of query text.
    ///
    /// Short queries clear the suggestions and never reach the network;
    /// anything else restarts the single debounce deadline.
    pub fn on_query_change(&mut self, text: &str) {
        self.session.query = text.to_string();

        if text.chars().count() < self.min_query_len {
            self.session.suggestions.clear();
            self.session.active = None;
            self.session.deadline = None;
            // A response still in flight for the longer query must not
            // repopulate the list we just cleared.
            self.invalidate_in_flight();
            return;
        }

        self.session.deadline = Some(Instant::now() + self.debounce);
    }

    /// The pending debounce deadline, if any. The driver sleeps until it.
    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.session.deadline
    }

    /// If the debounce deadline has passed, consume it and issue a fetch.
    pub fn take_due_fetch(&mut self, now: Instant) -> Option<GeocodeRequest> {
        let deadline = self.session.deadline?;
        if now < deadline {
            return None;
        }
        self.session.deadline = None;
        self.session.last_issued += 1;
        debug!(
            sequence = self.session.last_issued,
            query = %self.session.query,
            "issuing geocode fetch"
        );
        Some(GeocodeRequest {
            sequence: self.session.last_issued,
            query: self.session.query.clone(),
            limit: self.limit,
            country: self.country.clone(),
        })
    }

    /// Apply a geocode response; returns whether the visible state changed.
    ///
    /// Responses tagged with anything but the newest issued sequence are
    /// discarded. Failures and empty results degrade to an empty list; the
    /// input stays usable.
    pub fn apply_response(
        &mut self,
        sequence: u64,
        result: Result<Vec<AddressSuggestion>, GeocodeError>,
    ) -> bool {
        if sequence != self.session.last_issued {
            debug!(
                sequence,
                newest = self.session.last_issued,
                "discarding superseded geocode response"
            );
            return false;
        }

        match result {
            Ok(suggestions) => {
                self.session.suggestions = suggestions;
            }
            Err(err) => {
                warn!(%err, "geocode fetch failed; clearing suggestions");
                self.session.suggestions.clear();
            }
        }
        self.session.active = None;
        true
    }

    /// Handle a navigation key.
    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Escape => {
                self.session.suggestions.clear();
                self.session.active = None;
                self.invalidate_in_flight();
                KeyOutcome::Cleared
            }
            _ if self.session.suggestions.is_empty() => KeyOutcome::Ignored,
            Key::ArrowDown => {
                let last = self.session.suggestions.len() - 1;
                let next = match self.session.active {
                    Some(i) if i < last => i + 1,
                    // Wrap past the end (and enter the list from the top).
                    _ => 0,
                };
                self.session.active = Some(next);
                KeyOutcome::CursorMoved(next)
            }
            Key::ArrowUp => {
                let last = self.session.suggestions.len() - 1;
                let next = match self.session.active {
                    Some(i) if i > 0 => i - 1,
                    // Wrap from the top (and enter the list from the bottom).
                    _ => last,
                };
                self.session.active = Some(next);
                KeyOutcome::CursorMoved(next)
            }
            Key::Enter => match self.session.active {
                Some(index) => KeyOutcome::Committed(self.commit(index)),
                None => KeyOutcome::Ignored,
            },
        }
    }

    /// Commit a suggestion by position, as a click on the list would.
    pub fn on_select(&mut self, index: usize) -> Option<ResolvedAddress> {
        if index >= self.session.suggestions.len() {
            return None;
        }
        Some(self.commit(index))
    }

    fn commit(&mut self, index: usize) -> ResolvedAddress {
        let suggestion = self.session.suggestions[index].clone();
        let resolved = ResolvedAddress {
            display_name: suggestion.display_name.clone(),
            coordinate: suggestion.coordinate,
            suburb: derive_suburb(&suggestion.address).to_string(),
        };

        self.session.query = suggestion.display_name;
        self.session.suggestions.clear();
        self.session.active = None;
        self.session.deadline = None;
        self.invalidate_in_flight();
        debug!(display_name = %resolved.display_name, suburb = %resolved.suburb, "suggestion committed");
        resolved
    }

    // Bump the sequence so any in-flight response compares stale.
    fn invalidate_in_flight(&mut self) {
        self.session.last_issued += 1;
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.session.query
    }

    #[must_use]
    pub fn suggestions(&self) -> &[AddressSuggestion] {
        &self.session.suggestions
    }

    /// Index of the keyboard-active suggestion, `None` when nothing is
    /// active.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.session.active
    }
}
