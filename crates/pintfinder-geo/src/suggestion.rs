//! Address candidates returned by the geocoding collaborator.
//!
//! The wire format follows Nominatim's `jsonv2` search output: coordinates
//! arrive as decimal strings and the structured address breakdown is a bag of
//! optional fields. [`RawPlace`] is the serde view of one candidate;
//! [`AddressSuggestion`] is the parsed form handed to the autocomplete
//! controller.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Coordinate;

/// Structured address components of a geocoding candidate.
///
/// Every field is optional; which ones are populated depends on the kind of
/// place the candidate describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub city_district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
}

/// One ranked address candidate, ready for display and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    /// Stable candidate identifier from the geocoding service.
    pub place_id: u64,
    /// Human-readable address line shown in the suggestion list.
    pub display_name: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub address: AddressDetails,
}

/// Raw candidate as it appears on the wire, before coordinate parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub place_id: u64,
    pub display_name: String,
    /// Latitude as a decimal string, per the Nominatim wire format.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    #[serde(default)]
    pub address: Option<AddressDetails>,
}

impl RawPlace {
    /// Parse the string coordinates into an [`AddressSuggestion`].
    ///
    /// Returns `None` when either coordinate fails to parse; the caller skips
    /// such candidates rather than failing the whole response.
    #[must_use]
    pub fn into_suggestion(self) -> Option<AddressSuggestion> {
        let lat = self.lat.parse::<f64>();
        let lon = self.lon.parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) => Some(AddressSuggestion {
                place_id: self.place_id,
                display_name: self.display_name,
                coordinate: Coordinate::new(lat, lon),
                address: self.address.unwrap_or_default(),
            }),
            _ => {
                warn!(
                    place_id = self.place_id,
                    raw_lat = %self.lat,
                    raw_lon = %self.lon,
                    "skipping candidate with unparsable coordinates"
                );
                None
            }
        }
    }
}

/// Ordered suburb extraction rules, most specific first.
///
/// Evaluated in sequence; the first rule yielding a non-empty value wins.
const SUBURB_RULES: &[fn(&AddressDetails) -> Option<&str>] = &[
    |a| a.suburb.as_deref(),
    |a| a.city_district.as_deref(),
    |a| a.city.as_deref(),
    |a| a.town.as_deref(),
];

/// Fallback value when no rule produces a suburb.
pub const UNKNOWN_SUBURB: &str = "Unknown";

/// Derive a suburb from a structured address breakdown.
///
/// Tries `suburb`, then `city_district`, then `city`, then `town`; the first
/// non-empty field wins, otherwise [`UNKNOWN_SUBURB`].
#[must_use]
pub fn derive_suburb(address: &AddressDetails) -> &str {
    SUBURB_RULES
        .iter()
        .find_map(|rule| rule(address).map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(UNKNOWN_SUBURB)
}
