//! Filtering and ordering of the visible venue list.
//!
//! [`select`] is the single pure function between the raw venue snapshot and
//! what the list (and map markers) render: a deterministic function of its
//! inputs with no hidden state, safe to re-run on every filter keystroke or
//! sort toggle.

use itertools::Itertools;

use crate::model::Venue;

/// How the suburb filter matches.
///
/// `Exact` backs the enumerated suburb picker; `Contains` backs free-text
/// entry. Both are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuburbFilter {
    #[default]
    Any,
    Exact(String),
    Contains(String),
}

/// Filter parameters for the venue list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueFilter {
    /// Case-insensitive substring match against the venue name; empty passes
    /// all.
    pub name: String,
    pub suburb: SuburbFilter,
}

impl VenueFilter {
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suburb: SuburbFilter::Any,
        }
    }

    fn matches(&self, venue: &Venue) -> bool {
        let name_ok = self.name.is_empty()
            || venue
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase());

        let suburb_ok = match &self.suburb {
            SuburbFilter::Any => true,
            SuburbFilter::Exact(wanted) => venue
                .suburb
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
            SuburbFilter::Contains(fragment) => {
                fragment.is_empty()
                    || venue
                        .suburb
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&fragment.to_lowercase()))
            }
        };

        name_ok && suburb_ok
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Preserve the input order.
    #[default]
    Unsorted,
    /// Ascending by minimum pint price; venues without pints last.
    PriceAsc,
    /// Descending by minimum pint price; venues without pints still last.
    PriceDesc,
}

// Venues without pints sort as if infinitely expensive in both directions.
fn price_key(venue: &Venue) -> f64 {
    venue.min_pint_price().unwrap_or(f64::INFINITY)
}

/// Compute the visible, ordered subset of `venues`.
///
/// Ties under the sort key keep the venues' original relative order (stable
/// sort), and `select` never mutates its inputs.
#[must_use]
pub fn select<'a>(venues: &'a [Venue], filter: &VenueFilter, sort: SortMode) -> Vec<&'a Venue> {
    let filtered = venues.iter().filter(|venue| filter.matches(venue));

    match sort {
        SortMode::Unsorted => filtered.collect(),
        SortMode::PriceAsc => filtered
            .sorted_by(|a, b| price_key(a).total_cmp(&price_key(b)))
            .collect(),
        SortMode::PriceDesc => filtered
            .sorted_by(|a, b| {
                let (a, b) = (price_key(a), price_key(b));
                match (a.is_infinite(), b.is_infinite()) {
                    (false, false) => b.total_cmp(&a),
                    (true, false) => std::cmp::Ordering::Greater,
                    (false, true) => std::cmp::Ordering::Less,
                    (true, true) => std::cmp::Ordering::Equal,
                }
            })
            .collect(),
    }
}

/// Distinct suburbs across a venue snapshot, in first-seen order.
///
/// Feeds the enumerated suburb picker.
#[must_use]
pub fn suburbs(venues: &[Venue]) -> Vec<&str> {
    venues
        .iter()
        .filter_map(|venue| venue.suburb.as_deref())
        .unique()
        .collect()
}
