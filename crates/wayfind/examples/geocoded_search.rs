//! Geocoded search
//!
//! Reads geocoder credentials from the environment (`GEOCODER_PROVIDER`,
//! `GEOCODER_API_KEY` or `GOOGLE_MAPS_API_KEY`). Without credentials the
//! search still runs, resolving only the state from the location text.
//!
//! ```sh
//! GOOGLE_MAPS_API_KEY=... cargo run --example geocoded_search -- "Edison, NJ"
//! ```

use tracing::Level;
use wayfind::{Candidate, ListingSearcher, PlacementTier, RawLocation, SearchRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    wayfind::init_logging(Level::INFO)?;

    let location = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Edison, NJ".to_string());

    let searcher = ListingSearcher::from_env()?;
    println!("Geocoding enabled: {}", searcher.geocoding_enabled());

    let pool = vec![
        Candidate::new("edison", "Bright Steps ABA")
            .with_location(RawLocation::new("Edison", "NJ").with_coordinates(40.52, -74.41)),
        Candidate::new("brooklyn", "Harbor Speech")
            .with_tier(PlacementTier::Premium)
            .with_location(RawLocation::new("Brooklyn", "NY").with_coordinates(40.68, -73.94)),
        Candidate::new("trenton", "Capital Counseling")
            .with_location(RawLocation::new("Trenton", "NJ")),
    ];

    let request = SearchRequest::builder().near(&location).radius(40.0).build();
    let page = searcher.search(&pool, &request).await;

    println!(
        "Origin: {} ({:?})",
        page.origin.label.as_deref().unwrap_or("unknown"),
        page.origin.source
    );
    for result in &page.results {
        println!(
            "  {} - {}",
            result.candidate.name,
            result.formatted_distance.as_deref().unwrap_or("distance unknown")
        );
    }

    Ok(())
}
