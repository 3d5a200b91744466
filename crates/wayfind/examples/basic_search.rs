//! Basic listing search functionality
//!
//! This example demonstrates the fundamental search operations:
//! - Building a candidate pool
//! - Searching from known coordinates with a radius
//! - Degraded search when the origin cannot be located
//! - Paging through results

use wayfind::{
    Attribute, Candidate, Coordinates, ListingSearcher, PlacementTier, RawLocation,
    ResolvedOrigin, ResultPage, SearchRequest,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = sample_pool();
    let searcher = ListingSearcher::new();

    // Search from coordinates within 30 miles
    println!("ABA providers within 30 miles of Edison, NJ:");
    let edison = Coordinates::new(40.5187, -74.4121)?;
    let request = SearchRequest::builder()
        .query("aba")
        .near_coordinates(edison)
        .radius(30.0)
        .show_tier_badges(true)
        .build();
    let page = searcher.search_with_origin(&pool, &request, &ResolvedOrigin::supplied(edison));
    print_page(&page);

    // Without an origin, ordering falls back to tier then relevance
    println!("\nAll providers, no location:");
    let page = searcher.search_with_origin(
        &pool,
        &SearchRequest::default(),
        &ResolvedOrigin::unresolved(),
    );
    print_page(&page);

    // Small pages
    println!("\nSecond page of two:");
    let request = SearchRequest::builder().page(1).page_size(2).build();
    let page = searcher.search_with_origin(&pool, &request, &ResolvedOrigin::unresolved());
    print_page(&page);

    Ok(())
}

fn sample_pool() -> Vec<Candidate> {
    let provider = |id: &str, name: &str, city: &str, lat: f64, lng: f64| {
        Candidate::new(id, name)
            .with_location(RawLocation::new(city, "NJ").with_coordinates(lat, lng))
    };

    vec![
        provider("1", "Bright Steps ABA", "Edison", 40.52, -74.41)
            .with_attribute(Attribute::new("category", "aba").with_label("ABA Therapy")),
        provider("2", "Little Voices Speech", "Princeton", 40.36, -74.67)
            .with_tier(PlacementTier::Featured)
            .with_attribute(Attribute::new("category", "speech").with_label("Speech Therapy")),
        provider("3", "Shore ABA Partners", "Toms River", 39.95, -74.20)
            .with_tier(PlacementTier::Premium)
            .with_attribute(Attribute::new("category", "aba").with_label("ABA Therapy")),
        provider("4", "Garden State Autism Center", "Newark", 40.74, -74.17)
            .with_attribute(Attribute::new("category", "aba").with_label("ABA Therapy")),
        Candidate::new("5", "Hope House Counseling")
            .with_location(RawLocation::new("Trenton", "new-jersey"))
            .with_attribute(Attribute::new("category", "counseling").with_label("Counseling")),
    ]
}

fn print_page(page: &ResultPage) {
    for (i, result) in page.results.iter().enumerate() {
        println!(
            "  {}. {}{} - {} - relevance {:.2}",
            page.page * page.page_size + i + 1,
            result.candidate.name,
            result
                .tier_badge
                .map(|badge| format!(" [{badge}]"))
                .unwrap_or_default(),
            result.formatted_distance.as_deref().unwrap_or("distance unknown"),
            result.relevance_score,
        );
    }
    println!(
        "  {} of {} results (page {} of {}, geolocation used: {})",
        page.results.len(),
        page.total_count,
        page.page + 1,
        page.total_pages.max(1),
        page.used_geolocation
    );
}
