//! Map/list view-state synchronization.
//!
//! The map and the venue list render independently but share one view state:
//! center, zoom and the current selection. All writes go through
//! [`ViewState::apply`], a small state machine with three modes and two
//! events, which makes the precedence rule explicit: a user's venue
//! selection is never overridden by a passively arriving geolocation fix.
//!
//! Renderers read through the [`MapView`] and [`ListView`] projections and
//! never hold a mutable reference.

use std::sync::Arc;
use std::time::Duration;

use pintfinder_geo::{Coordinate, GeolocationService, with_timeout};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{config::DiscoveryConfig, model::VenueId};

/// Where the current map framing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Initial framing from configuration.
    #[default]
    Default,
    /// The user selected a venue; passive events no longer move the map.
    UserSelected,
    /// A geolocation fix centered the map.
    GeoCentered,
}

/// Events that may move the map.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    VenueSelected { id: VenueId, coordinate: Coordinate },
    GeolocationResolved(Coordinate),
}

/// An accepted framing change, for the map renderer to animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewChange {
    pub center: Coordinate,
    pub zoom: u8,
    /// Framing changes must animate, never jump.
    pub animate: bool,
    /// Selection should also scroll the map into view if it is off-screen.
    pub reveal_map: bool,
}

/// Read-only snapshot for the map renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Read-only snapshot for the list renderer: the list only cares about which
/// venue to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListView {
    pub selected: Option<VenueId>,
}

/// Shared view state for one discovery session. Single writer; mutated only
/// through [`Self::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    center: Coordinate,
    zoom: u8,
    selected: Option<VenueId>,
    mode: ViewMode,
    detail_zoom: u8,
    local_zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
}

impl ViewState {
    #[must_use]
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            center: config.default_center,
            zoom: config.clamp_zoom(config.default_zoom),
            selected: None,
            mode: ViewMode::Default,
            detail_zoom: config.detail_zoom,
            local_zoom: config.local_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Apply one event; `Some` means the framing changed and the map must
    /// animate to it, `None` means the event was ignored.
    pub fn apply(&mut self, event: ViewEvent) -> Option<ViewChange> {
        match event {
            ViewEvent::VenueSelected { id, coordinate } => {
                debug!(%id, %coordinate, "venue selected");
                self.mode = ViewMode::UserSelected;
                self.selected = Some(id);
                Some(self.reframe(coordinate, self.detail_zoom, true))
            }
            ViewEvent::GeolocationResolved(coordinate) => match self.mode {
                ViewMode::UserSelected => {
                    // Explicit user intent wins over a passive fix, even one
                    // that was already in flight when the selection happened.
                    debug!(%coordinate, "geolocation fix ignored after user selection");
                    None
                }
                ViewMode::Default | ViewMode::GeoCentered => {
                    info!(%coordinate, "centering on geolocation fix");
                    self.mode = ViewMode::GeoCentered;
                    Some(self.reframe(coordinate, self.local_zoom, false))
                }
            },
        }
    }

    fn reframe(&mut self, center: Coordinate, zoom: u8, reveal_map: bool) -> ViewChange {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        ViewChange {
            center: self.center,
            zoom: self.zoom,
            animate: true,
            reveal_map,
        }
    }

    #[must_use]
    pub fn map_view(&self) -> MapView {
        MapView {
            center: self.center,
            zoom: self.zoom,
        }
    }

    #[must_use]
    pub fn list_view(&self) -> ListView {
        ListView {
            selected: self.selected,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }
}

/// Request a single geolocation fix and feed it into the view-state channel.
///
/// Fires at most one [`ViewEvent::GeolocationResolved`]. Every failure mode
/// (denied, unavailable, timeout, or a closed channel) is logged and
/// swallowed; the view simply stays on its default framing.
pub fn spawn_geolocation(
    service: Arc<dyn GeolocationService>,
    timeout: Duration,
    events: mpsc::Sender<ViewEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match with_timeout(service.as_ref(), timeout).await {
            Ok(coordinate) => {
                if events
                    .send(ViewEvent::GeolocationResolved(coordinate))
                    .await
                    .is_err()
                {
                    debug!("view-state channel closed before geolocation fix was delivered");
                }
            }
            Err(err) => {
                warn!(%err, "geolocation failed; keeping default view");
            }
        }
    })
}
