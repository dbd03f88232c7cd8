//! Domain records the discovery core operates on.
//!
//! Venues and their pint prices are owned by the persistence collaborator;
//! the core treats a fetched snapshot as read-only input. The one derived
//! quantity, a venue's minimum pint price, is always recomputed and never
//! stored.

use chrono::{DateTime, Utc};
use pintfinder_geo::Coordinate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VenueId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PintId(pub i64);

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "venue:{}", self.0)
    }
}

impl std::fmt::Display for PintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pint:{}", self.0)
    }
}

/// A single priced item record belonging to a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pint {
    pub id: PintId,
    pub venue_id: VenueId,
    pub name: String,
    /// Positive price in the venue's local currency.
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A place with a name, address, coordinates and associated price records.
///
/// `pints` preserves insertion order as reported by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub address: String,
    pub suburb: Option<String>,
    pub coordinate: Coordinate,
    pub pints: Vec<Pint>,
}

impl Venue {
    /// Cheapest pint currently on record, `None` when the venue has no pints.
    #[must_use]
    pub fn min_pint_price(&self) -> Option<f64> {
        self.pints
            .iter()
            .map(|pint| pint.price)
            .min_by(f64::total_cmp)
    }
}

/// A committed address suggestion, resolved to what the caller needs to
/// create a venue: display text, coordinates and a derived suburb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub suburb: String,
}
