//! Integration tests for the PintFinder discovery core.
//!
//! These run against the full public API: the venue store feeding the
//! filter/sort engine, the view-state machine coordinating map and list, and
//! the autocomplete session driven end-to-end against a fake geocoder under
//! paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use pintfinder::{
    Autocomplete, DiscoveryConfig, InputEvent, Key, MemoryVenueStore, NewVenue, OutputEvent,
    SortMode, SuburbFilter, VenueFilter, VenueStore, ViewEvent, ViewMode, ViewState, select,
    spawn_geolocation, suburbs,
};
use pintfinder_geo::{
    AddressDetails, AddressSuggestion, Coordinate, GeocodeClient, GeocodeError, GeolocationError,
    GeolocationService,
};
use tokio::sync::mpsc;

fn setup_test_env() {
    let _ = pintfinder::init_logging(tracing::Level::WARN);
}

async fn seeded_store() -> MemoryVenueStore {
    let store = MemoryVenueStore::new();
    let corner = store
        .insert_venue(NewVenue {
            name: "The Corner Hotel".to_string(),
            address: "57 Swan Street".to_string(),
            suburb: Some("Richmond".to_string()),
            coordinate: Coordinate::new(-37.8239, 144.9981),
        })
        .await
        .unwrap();
    store.insert_pint(corner.id, "Lager", 12.0).await.unwrap();
    store.insert_pint(corner.id, "Pale Ale", 10.5).await.unwrap();

    let standard = store
        .insert_venue(NewVenue {
            name: "The Standard".to_string(),
            address: "293 Fitzroy Street".to_string(),
            suburb: Some("Fitzroy".to_string()),
            coordinate: Coordinate::new(-37.7963, 144.9830),
        })
        .await
        .unwrap();
    store.insert_pint(standard.id, "Stout", 9.0).await.unwrap();

    store
        .insert_venue(NewVenue {
            name: "The Empty Glass".to_string(),
            address: "1 Nowhere Lane".to_string(),
            suburb: Some("Richmond".to_string()),
            coordinate: Coordinate::new(-37.8300, 145.0000),
        })
        .await
        .unwrap();

    store
}

#[tokio::test]
async fn store_snapshot_through_filter_sort_and_view() {
    setup_test_env();
    let store = seeded_store().await;
    let config = DiscoveryConfig::default();

    // 1. Snapshot, sorted cheapest-first with the pintless venue last.
    let venues = store.list_venues_with_pints().await.unwrap();
    let visible = select(&venues, &VenueFilter::default(), SortMode::PriceAsc);
    let names: Vec<_> = visible.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(
        names,
        ["The Standard", "The Corner Hotel", "The Empty Glass"]
    );

    // 2. Suburb picker options come from the snapshot.
    assert_eq!(suburbs(&venues), ["Richmond", "Fitzroy"]);

    // 3. Filtering narrows both list and map markers, never the view state.
    let filter = VenueFilter {
        name: String::new(),
        suburb: SuburbFilter::Exact("Richmond".to_string()),
    };
    let richmond = select(&venues, &filter, SortMode::PriceAsc);
    assert_eq!(richmond.len(), 2);

    // 4. Selecting the cheapest venue recenters the map at detail zoom and
    //    highlights the row.
    let mut view = ViewState::new(&config);
    let cheapest = visible[0];
    let change = view
        .apply(ViewEvent::VenueSelected {
            id: cheapest.id,
            coordinate: cheapest.coordinate,
        })
        .expect("selection must move the map");
    assert_eq!(change.center, cheapest.coordinate);
    assert_eq!(change.zoom, config.detail_zoom);
    assert_eq!(view.list_view().selected, Some(cheapest.id));

    // 5. A geolocation fix that resolves afterwards is ignored.
    let ignored = view.apply(ViewEvent::GeolocationResolved(Coordinate::new(
        -37.81, 144.96,
    )));
    assert!(ignored.is_none());
    assert_eq!(view.mode(), ViewMode::UserSelected);
}

struct SlowFix {
    position: Coordinate,
    delay: Duration,
}

#[async_trait::async_trait]
impl GeolocationService for SlowFix {
    async fn request_position(&self) -> Result<Coordinate, GeolocationError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.position)
    }
}

#[tokio::test(start_paused = true)]
async fn geolocation_centers_the_default_view_once() {
    setup_test_env();
    let config = DiscoveryConfig::default();
    let mut view = ViewState::new(&config);

    let (tx, mut rx) = mpsc::channel(4);
    let service = Arc::new(SlowFix {
        position: Coordinate::new(-37.81, 144.96),
        delay: Duration::from_secs(2),
    });
    let _task = spawn_geolocation(service, config.geolocation_timeout, tx);

    let event = rx.recv().await.expect("fix should arrive");
    let change = view.apply(event).expect("default view accepts the fix");
    assert_eq!(change.center, Coordinate::new(-37.81, 144.96));
    assert_eq!(change.zoom, config.local_zoom);
    assert_eq!(view.mode(), ViewMode::GeoCentered);

    // Single-shot: the channel closes after the one fix.
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn geolocation_slower_than_the_deadline_leaves_default_view() {
    setup_test_env();
    let config = DiscoveryConfig::default();
    let view = ViewState::new(&config);

    let (tx, mut rx) = mpsc::channel(4);
    let service = Arc::new(SlowFix {
        position: Coordinate::new(-37.81, 144.96),
        delay: config.geolocation_timeout + Duration::from_secs(5),
    });
    let _task = spawn_geolocation(service, config.geolocation_timeout, tx);

    assert!(rx.recv().await.is_none());
    assert_eq!(view.mode(), ViewMode::Default);
    assert_eq!(view.map_view().zoom, config.default_zoom);
}

/// Geocoder serving one Richmond address, slowly for queries starting with
/// "slow".
struct TestGeocoder;

#[async_trait::async_trait]
impl GeocodeClient for TestGeocoder {
    async fn query(
        &self,
        text: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<AddressSuggestion>, GeocodeError> {
        assert_eq!(limit, 5);
        assert_eq!(country, Some("au"));
        let delay = if text.starts_with("slow") {
            Duration::from_millis(2_000)
        } else {
            Duration::from_millis(20)
        };
        tokio::time::sleep(delay).await;
        Ok(vec![AddressSuggestion {
            place_id: 77,
            display_name: format!("{text}, Richmond VIC"),
            coordinate: Coordinate::new(-37.8239, 144.9981),
            address: AddressDetails {
                suburb: None,
                city_district: Some("Fitzroy".to_string()),
                city: Some("Melbourne".to_string()),
                town: None,
            },
        }])
    }
}

#[tokio::test(start_paused = true)]
async fn autocomplete_session_resolves_an_address_end_to_end() {
    setup_test_env();
    let config = DiscoveryConfig::default();
    let autocomplete = Autocomplete::new(Arc::new(TestGeocoder), &config);
    let (input_tx, input_rx) = mpsc::channel(16);
    let (output_tx, mut output_rx) = mpsc::channel(16);
    tokio::spawn(autocomplete.run(input_rx, output_tx));

    // Typing bursts collapse into one fetch; a superseded slow fetch never
    // surfaces.
    input_tx
        .send(InputEvent::Query("slow swan".to_string()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(450)).await;
    input_tx
        .send(InputEvent::Query("57 swan street".to_string()))
        .await
        .unwrap();

    let OutputEvent::Suggestions(suggestions) = output_rx.recv().await.unwrap() else {
        panic!("expected suggestions first");
    };
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].display_name, "57 swan street, Richmond VIC");

    // Keyboard commit resolves coordinates plus the fallback-derived suburb.
    input_tx.send(InputEvent::Key(Key::ArrowDown)).await.unwrap();
    input_tx.send(InputEvent::Key(Key::Enter)).await.unwrap();

    let OutputEvent::Committed(resolved) = output_rx.recv().await.unwrap() else {
        panic!("expected a commit");
    };
    assert_eq!(resolved.coordinate, Coordinate::new(-37.8239, 144.9981));
    assert_eq!(resolved.suburb, "Fitzroy");

    // The stale slow response is discarded silently.
    let nothing = tokio::time::timeout(Duration::from_secs(5), output_rx.recv()).await;
    assert!(nothing.is_err(), "no further output expected");
}

#[tokio::test]
async fn committed_address_feeds_venue_creation() {
    setup_test_env();
    let store = MemoryVenueStore::new();
    let config = DiscoveryConfig::default();

    // Simulate the commit output of an autocomplete session.
    let resolved = pintfinder::ResolvedAddress {
        display_name: "57 Swan Street, Richmond VIC".to_string(),
        coordinate: Coordinate::new(-37.8239, 144.9981),
        suburb: "Richmond".to_string(),
    };

    let venue = store
        .insert_venue(NewVenue {
            name: "The Corner Hotel".to_string(),
            address: resolved.display_name.clone(),
            suburb: Some(resolved.suburb.clone()),
            coordinate: resolved.coordinate,
        })
        .await
        .unwrap();
    store.insert_pint(venue.id, "Lager", 11.5).await.unwrap();

    let venues = store.list_venues_with_pints().await.unwrap();
    let visible = select(&venues, &VenueFilter::by_name("corner"), SortMode::PriceAsc);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].min_pint_price(), Some(11.5));

    // Selecting the freshly created venue frames the map on it.
    let mut view = ViewState::new(&config);
    let change = view
        .apply(ViewEvent::VenueSelected {
            id: visible[0].id,
            coordinate: visible[0].coordinate,
        })
        .unwrap();
    assert_eq!(change.center, resolved.coordinate);
}
