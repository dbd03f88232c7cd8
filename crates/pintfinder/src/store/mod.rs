//! Persistence collaborator contract.
//!
//! The discovery core only consumes the read shape (venues with their pints,
//! in insertion order) and emits identifiers and fields for the write
//! operations; real storage lives behind [`VenueStore`]. [`MemoryVenueStore`]
//! is the in-process implementation used by tests and demos.

use std::sync::Mutex;

use chrono::Utc;
use pintfinder_geo::Coordinate;
use thiserror::Error;
use tracing::debug;

use crate::model::{Pint, PintId, Venue, VenueId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("venue {0} not found")]
    VenueNotFound(VenueId),
    #[error("pint {0} not found")]
    PintNotFound(PintId),
    #[error("price must be positive, got {0}")]
    InvalidPrice(f64),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Fields for creating a venue.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    pub suburb: Option<String>,
    pub coordinate: Coordinate,
}

/// Partial update for a pint record; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PintPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Read/insert/update/delete of venues and their price records.
#[async_trait::async_trait]
pub trait VenueStore: Send + Sync {
    /// Snapshot of all venues with their pints in insertion order.
    async fn list_venues_with_pints(&self) -> Result<Vec<Venue>, StoreError>;
    async fn insert_venue(&self, venue: NewVenue) -> Result<Venue, StoreError>;
    async fn delete_venue(&self, id: VenueId) -> Result<(), StoreError>;
    async fn insert_pint(
        &self,
        venue_id: VenueId,
        name: &str,
        price: f64,
    ) -> Result<Pint, StoreError>;
    async fn update_pint(&self, id: PintId, patch: PintPatch) -> Result<Pint, StoreError>;
    async fn delete_pint(&self, id: PintId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    venues: Vec<Venue>,
    next_venue_id: i64,
    next_pint_id: i64,
}

/// In-memory [`VenueStore`].
#[derive(Debug, Default)]
pub struct MemoryVenueStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryVenueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, continuing id allocation past it.
    #[must_use]
    pub fn with_venues(venues: Vec<Venue>) -> Self {
        let next_venue_id = venues.iter().map(|v| v.id.0).max().unwrap_or(0) + 1;
        let next_pint_id = venues
            .iter()
            .flat_map(|v| v.pints.iter().map(|p| p.id.0))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: Mutex::new(MemoryInner {
                venues,
                next_venue_id,
                next_pint_id,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl VenueStore for MemoryVenueStore {
    async fn list_venues_with_pints(&self) -> Result<Vec<Venue>, StoreError> {
        Ok(self.lock()?.venues.clone())
    }

    async fn insert_venue(&self, venue: NewVenue) -> Result<Venue, StoreError> {
        let mut inner = self.lock()?;
        let id = VenueId(inner.next_venue_id);
        inner.next_venue_id += 1;
        let venue = Venue {
            id,
            name: venue.name,
            address: venue.address,
            suburb: venue.suburb,
            coordinate: venue.coordinate,
            pints: Vec::new(),
        };
        inner.venues.push(venue.clone());
        debug!(%id, name = %venue.name, "venue inserted");
        Ok(venue)
    }

    async fn delete_venue(&self, id: VenueId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let before = inner.venues.len();
        inner.venues.retain(|v| v.id != id);
        if inner.venues.len() == before {
            return Err(StoreError::VenueNotFound(id));
        }
        Ok(())
    }

    async fn insert_pint(
        &self,
        venue_id: VenueId,
        name: &str,
        price: f64,
    ) -> Result<Pint, StoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(StoreError::InvalidPrice(price));
        }
        let mut inner = self.lock()?;
        let id = PintId(inner.next_pint_id);
        inner.next_pint_id += 1;
        let venue = inner
            .venues
            .iter_mut()
            .find(|v| v.id == venue_id)
            .ok_or(StoreError::VenueNotFound(venue_id))?;
        let now = Utc::now();
        let pint = Pint {
            id,
            venue_id,
            name: name.to_string(),
            price,
            created_at: now,
            updated_at: now,
        };
        venue.pints.push(pint.clone());
        Ok(pint)
    }

    async fn update_pint(&self, id: PintId, patch: PintPatch) -> Result<Pint, StoreError> {
        if let Some(price) = patch.price {
            if !price.is_finite() || price <= 0.0 {
                return Err(StoreError::InvalidPrice(price));
            }
        }
        let mut inner = self.lock()?;
        let pint = inner
            .venues
            .iter_mut()
            .flat_map(|v| v.pints.iter_mut())
            .find(|p| p.id == id)
            .ok_or(StoreError::PintNotFound(id))?;
        if let Some(name) = patch.name {
            pint.name = name;
        }
        if let Some(price) = patch.price {
            pint.price = price;
        }
        pint.updated_at = Utc::now();
        Ok(pint.clone())
    }

    async fn delete_pint(&self, id: PintId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        for venue in &mut inner.venues {
            let before = venue.pints.len();
            venue.pints.retain(|p| p.id != id);
            if venue.pints.len() != before {
                return Ok(());
            }
        }
        Err(StoreError::PintNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_venue(name: &str) -> NewVenue {
        NewVenue {
            name: name.to_string(),
            address: "57 Swan Street".to_string(),
            suburb: Some("Richmond".to_string()),
            coordinate: Coordinate::new(-37.82, 144.99),
        }
    }

    #[tokio::test]
    async fn pints_keep_insertion_order() {
        let store = MemoryVenueStore::new();
        let venue = store.insert_venue(new_venue("The Corner")).await.unwrap();
        store.insert_pint(venue.id, "Lager", 11.0).await.unwrap();
        store.insert_pint(venue.id, "Stout", 12.5).await.unwrap();
        store.insert_pint(venue.id, "Pale Ale", 9.5).await.unwrap();

        let venues = store.list_venues_with_pints().await.unwrap();
        let names: Vec<_> = venues[0].pints.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Lager", "Stout", "Pale Ale"]);
        assert_eq!(venues[0].min_pint_price(), Some(9.5));
    }

    #[tokio::test]
    async fn non_positive_prices_are_rejected() {
        let store = MemoryVenueStore::new();
        let venue = store.insert_venue(new_venue("The Corner")).await.unwrap();
        assert!(matches!(
            store.insert_pint(venue.id, "Free Beer", 0.0).await,
            Err(StoreError::InvalidPrice(_))
        ));
        assert!(matches!(
            store.insert_pint(venue.id, "Owes You", -2.0).await,
            Err(StoreError::InvalidPrice(_))
        ));
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = MemoryVenueStore::new();
        let venue = store.insert_venue(new_venue("The Corner")).await.unwrap();
        let pint = store.insert_pint(venue.id, "Lager", 11.0).await.unwrap();

        let updated = store
            .update_pint(
                pint.id,
                PintPatch {
                    price: Some(9.0),
                    ..PintPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Lager");
        assert_eq!(updated.price, 9.0);
        assert!(updated.updated_at >= pint.updated_at);
    }

    #[tokio::test]
    async fn deletes_report_missing_records() {
        let store = MemoryVenueStore::new();
        assert!(matches!(
            store.delete_venue(VenueId(42)).await,
            Err(StoreError::VenueNotFound(_))
        ));
        assert!(matches!(
            store.delete_pint(PintId(42)).await,
            Err(StoreError::PintNotFound(_))
        ));

        let venue = store.insert_venue(new_venue("Going Away")).await.unwrap();
        store.delete_venue(venue.id).await.unwrap();
        assert!(store.list_venues_with_pints().await.unwrap().is_empty());
    }
}
