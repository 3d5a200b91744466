//! Property tests for ranking invariants.

use proptest::prelude::*;
use wayfind::{
    Candidate, Coordinates, PlacementTier, RankingConfig, RawLocation, ResolvedOrigin,
    SearchRequest, distance_miles, search_pool,
};

fn tier_strategy() -> impl Strategy<Value = PlacementTier> {
    prop_oneof![
        Just(PlacementTier::Featured),
        Just(PlacementTier::Premium),
        Just(PlacementTier::Free),
    ]
}

fn coordinates_strategy() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| {
        Coordinates::new(lat, lng).unwrap_or_else(|_| unreachable!("strategy stays in range"))
    })
}

/// Candidates clustered around the origin so radius filters bite; roughly
/// a quarter lack coordinates.
fn pool_strategy() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(
        (
            tier_strategy(),
            prop::option::weighted(0.75, (-1.0f64..1.0, -1.0f64..1.0)),
            prop::sample::select(vec!["Bright Steps", "Speech Works", "Hope House", "ABA Kids"]),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (tier, offset, name))| {
                let location = match offset {
                    Some((dlat, dlng)) => RawLocation::new("Edison", "NJ")
                        .with_coordinates(40.5 + dlat, -74.4 + dlng),
                    None => RawLocation::new("Edison", "NJ"),
                };
                Candidate::new(format!("c{i:03}"), name)
                    .with_tier(tier)
                    .with_location(location)
            })
            .collect()
    })
}

fn origin_strategy() -> impl Strategy<Value = ResolvedOrigin> {
    prop_oneof![
        Just(ResolvedOrigin::unresolved()),
        (40.0f64..41.0, -75.0f64..-74.0).prop_map(|(lat, lng)| {
            ResolvedOrigin::supplied(
                Coordinates::new(lat, lng).unwrap_or_else(|_| unreachable!("in range")),
            )
        }),
    ]
}

fn query_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "bright".to_string(),
        "speech works".to_string(),
        "aba".to_string(),
        "  ".to_string(),
    ]))
}

fn request(
    query: Option<String>,
    radius: Option<f64>,
    page: usize,
    page_size: usize,
) -> SearchRequest {
    let mut builder = SearchRequest::builder().page(page).page_size(page_size);
    if let Some(query) = query {
        builder = builder.query(query);
    }
    if let Some(radius) = radius {
        builder = builder.radius(radius);
    }
    builder.build()
}

proptest! {
    #[test]
    fn prop_distance_symmetric(a in coordinates_strategy(), b in coordinates_strategy()) {
        let ab = distance_miles(a, b);
        let ba = distance_miles(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn prop_ranking_is_idempotent(
        pool in pool_strategy(),
        origin in origin_strategy(),
        query in query_strategy(),
    ) {
        let config = RankingConfig::default();
        let search = request(query, None, 0, 100);
        let first = search_pool(&pool, &origin, &search, &config);
        let second = search_pool(&pool, &origin, &search, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_featured_never_below_lower_tiers(
        pool in pool_strategy(),
        origin in origin_strategy(),
        query in query_strategy(),
    ) {
        let config = RankingConfig::default();
        let page = search_pool(&pool, &origin, &request(query, None, 0, 100), &config);
        for pair in page.results.windows(2) {
            prop_assert!(pair[0].candidate.tier <= pair[1].candidate.tier);
        }
    }

    #[test]
    fn prop_missing_distance_sorts_last_within_tier(
        pool in pool_strategy(),
        query in query_strategy(),
    ) {
        let origin = ResolvedOrigin::supplied(Coordinates::new(40.5, -74.4).unwrap());
        let config = RankingConfig::default();
        let page = search_pool(&pool, &origin, &request(query, None, 0, 100), &config);
        for pair in page.results.windows(2) {
            if pair[0].candidate.tier == pair[1].candidate.tier {
                let unknown_first = pair[0].distance_miles.is_none();
                prop_assert!(!(unknown_first && pair[1].distance_miles.is_some()));
            }
        }
    }

    #[test]
    fn prop_pagination_is_complete(
        pool in pool_strategy(),
        origin in origin_strategy(),
        page_size in 1usize..8,
    ) {
        let config = RankingConfig::default();
        let full = search_pool(&pool, &origin, &request(None, None, 0, 100), &config);

        let mut paged = Vec::new();
        let mut page = 0;
        loop {
            let page_request = request(None, None, page, page_size);
            let result = search_pool(&pool, &origin, &page_request, &config);
            prop_assert_eq!(result.total_count, full.total_count);
            if result.results.is_empty() {
                break;
            }
            paged.extend(result.results.into_iter().map(|r| r.candidate.id));
            page += 1;
        }

        let expected: Vec<_> = full.results.into_iter().map(|r| r.candidate.id).collect();
        prop_assert_eq!(page, full.total_count.div_ceil(page_size));
        prop_assert_eq!(paged, expected);
    }

    #[test]
    fn prop_radius_excludes_only_known_far_candidates(
        pool in pool_strategy(),
        radius in 0.0f64..80.0,
    ) {
        let center = Coordinates::new(40.5, -74.4).unwrap();
        let origin = ResolvedOrigin::supplied(center);
        let config = RankingConfig::default();
        let page = search_pool(&pool, &origin, &request(None, Some(radius), 0, 100), &config);

        let unknown = pool
            .iter()
            .filter(|c| c.normalized_location().coordinates.is_none())
            .count();
        let unknown_kept = page.results.iter().filter(|r| r.distance_miles.is_none()).count();
        prop_assert_eq!(unknown_kept, unknown);

        for result in &page.results {
            if let Some(distance) = result.distance_miles {
                prop_assert!(distance <= radius + 1e-6);
            }
        }
        for candidate in &pool {
            if let Some(point) = candidate.normalized_location().coordinates {
                let kept = page.ids().any(|id| id == candidate.id.as_str());
                prop_assert_eq!(kept, distance_miles(center, point) <= radius + 1e-6);
            }
        }
    }

    #[test]
    fn prop_relevance_is_bounded(pool in pool_strategy(), query in query_strategy()) {
        let page = search_pool(
            &pool,
            &ResolvedOrigin::unresolved(),
            &request(query, None, 0, 100),
            &RankingConfig::default(),
        );
        for result in &page.results {
            prop_assert!((0.0..=1.0).contains(&result.relevance_score));
        }
    }
}
