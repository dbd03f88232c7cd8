//! PintFinder - Interactive Venue Discovery Core
//!
//! PintFinder pairs an interactive map with a filterable, sortable list of
//! venues and their pint prices. This crate is the discovery core behind
//! that pairing: a debounced, supersession-safe address autocomplete, a
//! view-state machine that keeps the independently rendered map and list
//! consistent, and a pure filter/sort engine over the venue snapshot.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pintfinder::{
//!     Autocomplete, DiscoveryConfig, InputEvent, SortMode, VenueFilter, ViewEvent, ViewState,
//!     select,
//! };
//! use pintfinder_geo::{Coordinate, NominatimClient};
//!
//! # async fn demo(venues: Vec<pintfinder::Venue>) -> pintfinder::Result<()> {
//! let config = DiscoveryConfig::default();
//!
//! // One shared view state per discovery session.
//! let mut view = ViewState::new(&config);
//! view.apply(ViewEvent::GeolocationResolved(Coordinate::new(
//!     -37.81, 144.96,
//! )));
//!
//! // The visible list is a pure function of snapshot + filter + sort.
//! let visible = select(&venues, &VenueFilter::by_name("corner"), SortMode::PriceAsc);
//!
//! // Autocomplete runs as its own event loop against a geocoder.
//! let geocoder = Arc::new(NominatimClient::new()?);
//! let autocomplete = Autocomplete::new(geocoder, &config);
//! let (input_tx, input_rx) = tokio::sync::mpsc::channel(16);
//! let (output_tx, _output_rx) = tokio::sync::mpsc::channel(16);
//! tokio::spawn(autocomplete.run(input_rx, output_tx));
//! input_tx
//!     .send(InputEvent::Query("57 swan st".to_string()))
//!     .await
//!     .ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency guarantees
//!
//! - At most one geocode fetch per debounce window of keyboard inactivity.
//! - Only the most recently issued geocode response ever updates the visible
//!   suggestion list, regardless of network completion order.
//! - A venue selection is never overridden by a late geolocation fix.
//!
//! Everything runs on one cooperative event loop; the session state has a
//! single owner and no locks.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod model;
pub mod select;
pub mod store;
pub mod view;

pub use autocomplete::{
    Autocomplete, GeocodeRequest, InputEvent, Key, KeyOutcome, OutputEvent, SearchQueryController,
};
pub use config::{DEFAULT_CENTER, DiscoveryConfig, DiscoveryConfigBuilder};
pub use error::{PintfinderError, Result};
pub use model::{Pint, PintId, ResolvedAddress, Venue, VenueId};
// Re-export the adapter subcrate's surface the core consumes.
pub use pintfinder_geo as geo;
pub use pintfinder_geo::{
    AddressSuggestion, Coordinate, GeocodeClient, GeolocationService, NominatimClient,
};
pub use select::{SortMode, SuburbFilter, VenueFilter, select, suburbs};
pub use store::{MemoryVenueStore, NewVenue, PintPatch, StoreError, VenueStore};
pub use view::{ListView, MapView, ViewChange, ViewEvent, ViewMode, ViewState, spawn_geolocation};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the PintFinder library.
///
/// Sets up structured logging with configurable levels and filtering. Call
/// this once at the start of your application to enable diagnostic output
/// from discovery operations.
///
/// # Examples
///
/// ```rust
/// use pintfinder::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), pintfinder::PintfinderError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
