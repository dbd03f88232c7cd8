//! Async glue between the autocomplete controller and the geocoder.
//!
//! [`Autocomplete::run`] is the session's event loop: it multiplexes input
//! events, the debounce timer and completed geocode fetches over one
//! `tokio::select!`. Fetches run in a [`JoinSet`] tagged with their sequence
//! number; a superseded fetch is left to finish and its result is discarded
//! by the controller when it joins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument, warn};

use pintfinder_geo::{AddressSuggestion, GeocodeClient, GeocodeError};

use super::{Key, KeyOutcome, SearchQueryController};
use crate::{config::DiscoveryConfig, model::ResolvedAddress};

/// User interactions fed into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The input's full text after a keystroke.
    Query(String),
    /// A navigation key.
    Key(Key),
    /// A click on the suggestion at this index.
    Select(usize),
}

/// Visible consequences for the embedding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// The suggestion list changed; render this.
    Suggestions(Vec<AddressSuggestion>),
    /// A suggestion was committed; the session's open phase is over.
    Committed(ResolvedAddress),
}

type FetchResult = (u64, Result<Vec<AddressSuggestion>, GeocodeError>);

/// One autocomplete input wired to a geocoder.
pub struct Autocomplete {
    controller: SearchQueryController,
    geocoder: Arc<dyn GeocodeClient>,
}

impl Autocomplete {
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodeClient>, config: &DiscoveryConfig) -> Self {
        Self {
            controller: SearchQueryController::new(config),
            geocoder,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &SearchQueryController {
        &self.controller
    }

    /// Drive the session until the input channel closes or the output side
    /// goes away.
    #[instrument(name = "Autocomplete session", skip_all)]
    pub async fn run(
        mut self,
        mut input: mpsc::Receiver<InputEvent>,
        output: mpsc::Sender<OutputEvent>,
    ) {
        let mut in_flight: JoinSet<FetchResult> = JoinSet::new();

        loop {
            let deadline = self.controller.debounce_deadline();

            tokio::select! {
                event = input.recv() => {
                    let Some(event) = event else { break };
                    if !self.handle_input(event, &output).await {
                        break;
                    }
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(request) = self.controller.take_due_fetch(Instant::now()) {
                        let geocoder = Arc::clone(&self.geocoder);
                        in_flight.spawn(async move {
                            let result = geocoder
                                .query(&request.query, request.limit, request.country.as_deref())
                                .await;
                            (request.sequence, result)
                        });
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    match joined {
                        Ok((sequence, result)) => {
                            if self.controller.apply_response(sequence, result) {
                                let visible = self.controller.suggestions().to_vec();
                                if output.send(OutputEvent::Suggestions(visible)).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Err(err) => warn!(%err, "geocode fetch task failed"),
                    }
                }
            }
        }

        debug!("autocomplete session closed");
    }

    /// Returns `false` when the output side has hung up.
    async fn handle_input(
        &mut self,
        event: InputEvent,
        output: &mpsc::Sender<OutputEvent>,
    ) -> bool {
        match event {
            InputEvent::Query(text) => {
                let was_showing = !self.controller.suggestions().is_empty();
                self.controller.on_query_change(&text);
                // A query shrinking below the minimum length wipes the
                // visible list; tell the UI, as Escape does.
                if was_showing && self.controller.suggestions().is_empty() {
                    return output
                        .send(OutputEvent::Suggestions(Vec::new()))
                        .await
                        .is_ok();
                }
                true
            }
            InputEvent::Key(key) => match self.controller.on_key(key) {
                KeyOutcome::Committed(resolved) => {
                    output.send(OutputEvent::Committed(resolved)).await.is_ok()
                }
                KeyOutcome::Cleared => output
                    .send(OutputEvent::Suggestions(Vec::new()))
                    .await
                    .is_ok(),
                KeyOutcome::CursorMoved(_) | KeyOutcome::Ignored => true,
            },
            InputEvent::Select(index) => match self.controller.on_select(index) {
                Some(resolved) => output.send(OutputEvent::Committed(resolved)).await.is_ok(),
                None => true,
            },
        }
    }
}
