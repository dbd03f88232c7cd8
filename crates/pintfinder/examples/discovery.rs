//! End-to-end discovery session against the live Nominatim endpoint.
//!
//! Run with: `cargo run --example discovery -- "57 swan street richmond"`

use std::sync::Arc;

use pintfinder::{
    Autocomplete, DiscoveryConfig, InputEvent, Key, MemoryVenueStore, NewVenue, OutputEvent,
    SortMode, VenueFilter, VenueStore, ViewEvent, ViewState, select,
};
use pintfinder_geo::NominatimClient;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> pintfinder::Result<()> {
    pintfinder::init_logging(tracing::Level::INFO)?;

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "57 swan street richmond".to_string());

    let config = DiscoveryConfig::default();
    let geocoder = Arc::new(NominatimClient::new()?);
    let autocomplete = Autocomplete::new(geocoder, &config);

    let (input_tx, input_rx) = mpsc::channel(16);
    let (output_tx, mut output_rx) = mpsc::channel(16);
    let session = tokio::spawn(autocomplete.run(input_rx, output_tx));

    // Type the query and let the debounce settle.
    input_tx.send(InputEvent::Query(query.clone())).await.ok();

    let Some(OutputEvent::Suggestions(suggestions)) = output_rx.recv().await else {
        println!("No suggestions for '{query}'");
        return Ok(());
    };
    println!("Suggestions for '{query}':");
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, suggestion.display_name);
    }
    if suggestions.is_empty() {
        return Ok(());
    }

    // Commit the top suggestion the way Enter would.
    input_tx.send(InputEvent::Key(Key::ArrowDown)).await.ok();
    input_tx.send(InputEvent::Key(Key::Enter)).await.ok();
    let Some(OutputEvent::Committed(resolved)) = output_rx.recv().await else {
        println!("No commit event");
        return Ok(());
    };
    println!(
        "Resolved: {} @ {} (suburb: {})",
        resolved.display_name, resolved.coordinate, resolved.suburb
    );

    drop(input_tx);
    session.await.ok();

    // Create a venue from the resolved address and show the sorted list.
    let store = MemoryVenueStore::new();
    let venue = store
        .insert_venue(NewVenue {
            name: "Demo Venue".to_string(),
            address: resolved.display_name.clone(),
            suburb: Some(resolved.suburb.clone()),
            coordinate: resolved.coordinate,
        })
        .await?;
    store.insert_pint(venue.id, "Lager", 11.5).await?;

    let venues = store.list_venues_with_pints().await?;
    let visible = select(&venues, &VenueFilter::default(), SortMode::PriceAsc);
    println!("Visible venues (cheapest first):");
    for venue in &visible {
        println!("  {} (min pint {:?})", venue.name, venue.min_pint_price());
    }

    // Selecting it recenters the shared view state at detail zoom.
    let mut view = ViewState::new(&config);
    if let Some(change) = view.apply(ViewEvent::VenueSelected {
        id: venue.id,
        coordinate: venue.coordinate,
    }) {
        println!("Map animates to {} at zoom {}", change.center, change.zoom);
    }

    Ok(())
}
