//! Tunables for a discovery session.
//!
//! [`DiscoveryConfig`] collects every knob the interactive subsystem reads:
//! debounce timing, autocomplete limits, the map's default framing and the
//! zoom presets the view-state machine applies on selection and geolocation.
//! Defaults describe the Melbourne deployment the app started with.

use std::time::Duration;

use pintfinder_geo::Coordinate;

use crate::error::PintfinderError;

/// Default map center when nothing has been selected or resolved yet.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(-37.840935, 144.946457);

/// Configuration for the interactive discovery subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// Idle period after the last keystroke before a geocode fetch is issued.
    pub debounce: Duration,
    /// Queries shorter than this never reach the geocoder.
    pub min_query_len: usize,
    /// Maximum number of address suggestions requested per fetch.
    pub suggestion_limit: usize,
    /// Optional ISO 3166-1 alpha-2 country restriction for geocoding.
    pub country: Option<String>,
    /// Map center before any selection or geolocation fix.
    pub default_center: Coordinate,
    /// Zoom before any selection or geolocation fix.
    pub default_zoom: u8,
    /// Zoom applied when the user selects a venue.
    pub detail_zoom: u8,
    /// Zoom applied when a geolocation fix centers the map.
    pub local_zoom: u8,
    /// Lower bound for any zoom the view state will hold.
    pub min_zoom: u8,
    /// Upper bound for any zoom the view state will hold.
    pub max_zoom: u8,
    /// Upper bound on the single geolocation request per session.
    pub geolocation_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            min_query_len: 3,
            suggestion_limit: 5,
            country: Some("au".to_string()),
            default_center: DEFAULT_CENTER,
            default_zoom: 9,
            detail_zoom: 15,
            local_zoom: 13,
            min_zoom: 1,
            max_zoom: 19,
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::new()
    }

    /// Clamp a requested zoom into the configured bounds.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Builder for discovery configurations with ergonomic defaults.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfigBuilder {
    config: DiscoveryConfig,
}

impl DiscoveryConfigBuilder {
    /// Create a new builder with sensible defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DiscoveryConfig::default(),
        }
    }

    /// Set the debounce delay between the last keystroke and the fetch.
    #[must_use]
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.config.debounce = delay;
        self
    }

    /// Set the minimum query length that triggers geocoding.
    #[must_use]
    pub fn min_query_len(mut self, len: usize) -> Self {
        self.config.min_query_len = len;
        self
    }

    /// Set the maximum number of suggestions fetched per query.
    #[must_use]
    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.config.suggestion_limit = limit;
        self
    }

    /// Restrict geocoding to one country, or lift the restriction with `None`.
    #[must_use]
    pub fn country(mut self, country: Option<&str>) -> Self {
        self.config.country = country.map(String::from);
        self
    }

    /// Set the map framing used before any selection or geolocation fix.
    #[must_use]
    pub fn default_view(mut self, center: Coordinate, zoom: u8) -> Self {
        self.config.default_center = center;
        self.config.default_zoom = zoom;
        self
    }

    /// Set the zoom presets applied on venue selection and geolocation.
    #[must_use]
    pub fn zoom_presets(mut self, detail: u8, local: u8) -> Self {
        self.config.detail_zoom = detail;
        self.config.local_zoom = local;
        self
    }

    /// Set the permitted zoom range.
    #[must_use]
    pub fn zoom_bounds(mut self, min: u8, max: u8) -> Self {
        self.config.min_zoom = min;
        self.config.max_zoom = max;
        self
    }

    /// Set the deadline for the single geolocation request.
    #[must_use]
    pub fn geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.config.geolocation_timeout = timeout;
        self
    }

    /// Validate and build the final configuration.
    ///
    /// Zoom presets are clamped into the configured bounds rather than
    /// rejected; contradictory bounds and degenerate limits are errors.
    pub fn build(mut self) -> Result<DiscoveryConfig, PintfinderError> {
        if self.config.min_zoom == 0 || self.config.min_zoom > self.config.max_zoom {
            return Err(PintfinderError::ConfigError(format!(
                "zoom bounds must satisfy 1 <= min <= max, got {}..={}",
                self.config.min_zoom, self.config.max_zoom
            )));
        }
        if self.config.min_query_len == 0 {
            return Err(PintfinderError::ConfigError(
                "minimum query length must be at least 1".to_string(),
            ));
        }
        if self.config.suggestion_limit == 0 {
            return Err(PintfinderError::ConfigError(
                "suggestion limit must be at least 1".to_string(),
            ));
        }

        self.config.default_zoom = self.config.clamp_zoom(self.config.default_zoom);
        self.config.detail_zoom = self.config.clamp_zoom(self.config.detail_zoom);
        self.config.local_zoom = self.config.clamp_zoom(self.config.local_zoom);
        Ok(self.config)
    }
}
