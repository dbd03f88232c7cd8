//! External location collaborators for PintFinder.
//!
//! This crate holds the two outward-facing adapters the discovery core talks
//! to: a forward-geocoding client ([`GeocodeClient`], implemented against the
//! Nominatim search API) and a single-shot device/location service
//! ([`GeolocationService`]). Both are expressed as traits so the core can be
//! driven by fakes in tests, with the real HTTP adapters living here.
//!
//! Failures from either collaborator are deliberately small enums; the
//! consumer degrades (empty suggestion list, default map view) rather than
//! propagating them further.

use serde::{Deserialize, Serialize};

pub mod error;
pub mod geolocation;
pub mod nominatim;
pub mod suggestion;

pub use error::{GeocodeError, GeolocationError};
pub use geolocation::{GeolocationService, IpApiGeolocation, with_timeout};
pub use nominatim::NominatimClient;
pub use suggestion::{AddressDetails, AddressSuggestion, derive_suburb};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Forward geocoding: resolve free text into ranked address candidates.
///
/// Implementations must return candidates already ordered by relevance; the
/// autocomplete controller does not re-rank.
#[async_trait::async_trait]
pub trait GeocodeClient: Send + Sync {
    /// Search for addresses matching `text`.
    ///
    /// `country` is an optional ISO 3166-1 alpha-2 restriction (e.g. `"au"`).
    /// An empty vec means no matches and is not an error.
    async fn query(
        &self,
        text: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<AddressSuggestion>, GeocodeError>;
}
