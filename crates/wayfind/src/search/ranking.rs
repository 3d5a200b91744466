//! Ordering and pagination of the filtered pool.
//!
//! The sort key is strictly lexicographic:
//!
//! 1. placement tier (`Featured`, then `Premium`, then `Free`)
//! 2. distance ascending, unknown distances last (only when the origin has
//!    coordinates)
//! 3. relevance descending
//! 4. candidate id ascending
//!
//! The final key makes the order total, so the same inputs always paginate the
//! same way. Ranking is a pure function of its inputs and never fails.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, instrument};
use wayfind_geo::{Coordinates, distance_miles, format_distance};

use crate::{
    config::RankingConfig,
    listing::{Candidate, PlacementTier, ServiceMode},
    origin::ResolvedOrigin,
    search::{filter::filter_candidates, relevance::RelevanceScorer, request::SearchRequest},
};

/// Reporting bucket for a result. Does not influence order.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSection {
    Featured,
    Nearby,
    Other,
}

/// Per-section totals over the whole filtered pool.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub featured: usize,
    pub nearby: usize,
    pub other: usize,
}

impl SectionCounts {
    fn record(&mut self, section: ResultSection) {
        match section {
            ResultSection::Featured => self.featured += 1,
            ResultSection::Nearby => self.nearby += 1,
            ResultSection::Other => self.other += 1,
        }
    }
}

/// A candidate annotated for display.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub candidate: Candidate,
    /// `None` when the origin or the candidate lacks coordinates
    pub distance_miles: Option<f64>,
    /// `"< 1 mi"`, `"12 mi"`
    pub formatted_distance: Option<String>,
    pub relevance_score: f64,
    pub section: ResultSection,
    pub within_service_radius: bool,
    /// Present only when the request asked for tier badges
    pub tier_badge: Option<&'static str>,
}

/// One page of ranked results plus metadata.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub results: Vec<RankedResult>,
    /// Size of the filtered pool before pagination
    pub total_count: usize,
    /// Zero-based page index as requested
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_more: bool,
    pub used_geolocation: bool,
    pub origin: ResolvedOrigin,
    pub sections: SectionCounts,
}

impl ResultPage {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.candidate.id.as_str())
    }
}

#[derive(Debug)]
struct Annotated<'a> {
    candidate: &'a Candidate,
    distance: Option<f64>,
    relevance: f64,
}

fn by_rank(origin_has_coordinates: bool) -> impl Fn(&Annotated<'_>, &Annotated<'_>) -> Ordering {
    move |a: &Annotated<'_>, b: &Annotated<'_>| {
        a.candidate
            .tier
            .cmp(&b.candidate.tier)
            .then_with(|| {
                if origin_has_coordinates {
                    compare_distance(a.distance, b.distance)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| b.relevance.total_cmp(&a.relevance))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders an already filtered pool and returns the requested page.
#[instrument(
    name = "Rank candidates",
    level = "debug",
    skip_all,
    fields(pool = filtered.len(), page = request.page)
)]
pub fn rank(
    filtered: &[&Candidate],
    origin: &ResolvedOrigin,
    request: &SearchRequest,
    config: &RankingConfig,
) -> ResultPage {
    let scorer = RelevanceScorer::new(config, request.query_text());
    let origin_point = origin.coordinates;

    let mut annotated: Vec<Annotated<'_>> = filtered
        .par_iter()
        .map(|&candidate| Annotated {
            candidate,
            distance: candidate_distance(origin_point, candidate),
            relevance: scorer.score(candidate),
        })
        .collect();

    annotated.par_sort_by(by_rank(origin_point.is_some()));

    let mut sections = SectionCounts::default();
    for item in &annotated {
        sections.record(section_of(item, config));
    }

    let total_count = annotated.len();
    let page_size = config.page_size(request.page_size);
    let total_pages = total_count.div_ceil(page_size);
    let start = request.page.saturating_mul(page_size);

    let results: Vec<_> = annotated
        .iter()
        .skip(start)
        .take(page_size)
        .map(|item| RankedResult {
            candidate: item.candidate.clone(),
            distance_miles: item.distance,
            formatted_distance: item.distance.map(format_distance),
            relevance_score: item.relevance,
            section: section_of(item, config),
            within_service_radius: within_service_radius(item.candidate, item.distance, config),
            tier_badge: item
                .candidate
                .tier
                .badge()
                .filter(|_| request.show_tier_badges),
        })
        .collect();

    debug!(
        total_count,
        returned = results.len(),
        used_geolocation = origin.used_geolocation(),
        "Ranked page"
    );

    ResultPage {
        results,
        total_count,
        page: request.page,
        page_size,
        total_pages,
        has_more: start.saturating_add(page_size) < total_count,
        used_geolocation: origin.used_geolocation(),
        origin: origin.clone(),
        sections,
    }
}

/// Filters `pool` for `request` and ranks the survivors.
pub fn search_pool(
    pool: &[Candidate],
    origin: &ResolvedOrigin,
    request: &SearchRequest,
    config: &RankingConfig,
) -> ResultPage {
    let filtered = filter_candidates(pool, request, origin);
    rank(&filtered, origin, request, config)
}

/// Runs many searches against one pool in parallel. Output order matches
/// `searches`.
#[instrument(name = "Rank bulk", level = "info", skip_all, fields(searches = searches.len()))]
pub fn rank_bulk(
    pool: &[Candidate],
    searches: &[(SearchRequest, ResolvedOrigin)],
    config: &RankingConfig,
) -> Vec<ResultPage> {
    searches
        .par_iter()
        .map(|(request, origin)| search_pool(pool, origin, request, config))
        .collect()
}

fn candidate_distance(origin: Option<Coordinates>, candidate: &Candidate) -> Option<f64> {
    let origin = origin?;
    let point = candidate.normalized_location().coordinates?;
    Some(distance_miles(origin, point))
}

fn section_of(item: &Annotated<'_>, config: &RankingConfig) -> ResultSection {
    if item.candidate.tier == PlacementTier::Featured {
        ResultSection::Featured
    } else if item
        .distance
        .is_some_and(|d| d <= config.nearby_radius_miles)
    {
        ResultSection::Nearby
    } else {
        ResultSection::Other
    }
}

fn within_service_radius(candidate: &Candidate, distance: Option<f64>, config: &RankingConfig) -> bool {
    if candidate.service_mode == ServiceMode::CenterBased {
        return true;
    }
    let radius = candidate
        .service_radius_miles
        .unwrap_or(config.default_service_radius_miles);
    distance.is_some_and(|d| d <= radius)
}

#[cfg(test)]
mod tests {
    use wayfind_geo::RawLocation;

    use super::*;
    use crate::listing::Attribute;

    fn at(id: &str, tier: PlacementTier, lat: f64, lng: f64) -> Candidate {
        Candidate::new(id, id)
            .with_tier(tier)
            .with_location(RawLocation::default().with_coordinates(lat, lng))
    }

    fn origin() -> ResolvedOrigin {
        ResolvedOrigin::supplied(Coordinates::new(0.0, 0.0).unwrap())
    }

    fn run(pool: &[Candidate], origin: &ResolvedOrigin, request: &SearchRequest) -> ResultPage {
        search_pool(pool, origin, request, &RankingConfig::default())
    }

    #[test]
    fn test_tier_dominates_distance() {
        let pool = vec![
            at("near-free", PlacementTier::Free, 0.0, 0.01),
            at("far-featured", PlacementTier::Featured, 0.0, 1.0),
            at("mid-premium", PlacementTier::Premium, 0.0, 0.5),
        ];
        let page = run(&pool, &origin(), &SearchRequest::default());
        assert_eq!(
            page.ids().collect::<Vec<_>>(),
            vec!["far-featured", "mid-premium", "near-free"]
        );
        assert!(page.used_geolocation);
    }

    #[test]
    fn test_missing_coordinates_sort_last_within_tier() {
        let pool = vec![
            Candidate::new("unknown", "unknown"),
            at("far", PlacementTier::Free, 0.0, 1.0),
            at("near", PlacementTier::Free, 0.0, 0.1),
        ];
        let page = run(&pool, &origin(), &SearchRequest::default());
        assert_eq!(page.ids().collect::<Vec<_>>(), vec!["near", "far", "unknown"]);
        assert_eq!(page.results[2].distance_miles, None);
        assert_eq!(page.results[2].formatted_distance, None);
    }

    #[test]
    fn test_degraded_mode_orders_by_relevance_then_id() {
        let pool = vec![
            at("b", PlacementTier::Free, 0.0, 0.1),
            at("a", PlacementTier::Free, 0.0, 2.0)
                .with_attribute(Attribute::new("category", "aba").with_label("ABA Therapy")),
            at("c", PlacementTier::Free, 0.0, 0.5),
        ];
        let request = SearchRequest::builder().query("aba").build();
        let page = run(&pool, &ResolvedOrigin::unresolved(), &request);

        assert!(!page.used_geolocation);
        assert_eq!(page.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(page.results.iter().all(|r| r.distance_miles.is_none()));
    }

    #[test]
    fn test_pagination_metadata() {
        let pool: Vec<_> = (0..12)
            .map(|i| Candidate::new(format!("c{i:02}"), "x"))
            .collect();

        let request = SearchRequest::builder().page(1).page_size(5).build();
        let page = run(&pool, &ResolvedOrigin::unresolved(), &request);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 5);
        assert!(page.has_more);
        assert_eq!(page.ids().next(), Some("c05"));

        let request = SearchRequest::builder().page(2).page_size(5).build();
        let page = run(&pool, &ResolvedOrigin::unresolved(), &request);
        assert_eq!(page.results.len(), 2);
        assert!(!page.has_more);

        let request = SearchRequest::builder().page(5).page_size(20).build();
        let page = run(&pool, &ResolvedOrigin::unresolved(), &request);
        assert!(page.is_empty());
        assert_eq!(page.total_count, 12);
        assert!(!page.has_more);
    }

    #[test]
    fn test_huge_page_index_does_not_overflow() {
        let pool = vec![Candidate::new("a", "a")];
        let request = SearchRequest::builder().page(usize::MAX).build();
        let page = run(&pool, &ResolvedOrigin::unresolved(), &request);
        assert!(page.is_empty());
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn test_sections_and_service_radius() {
        let pool = vec![
            at("featured", PlacementTier::Featured, 0.0, 2.0),
            at("nearby", PlacementTier::Free, 0.0, 0.1)
                .with_service_mode(ServiceMode::InHome, Some(10.0)),
            at("other", PlacementTier::Free, 0.0, 1.0)
                .with_service_mode(ServiceMode::InHome, None),
            Candidate::new("unknown", "unknown").with_service_mode(ServiceMode::Hybrid, None),
        ];
        let page = run(&pool, &origin(), &SearchRequest::default());

        assert_eq!(
            page.sections,
            SectionCounts {
                featured: 1,
                nearby: 1,
                other: 2
            }
        );

        let by_id = |id: &str| {
            page.results
                .iter()
                .find(|r| r.candidate.id.as_str() == id)
                .unwrap()
        };
        assert!(by_id("featured").within_service_radius);
        assert!(by_id("nearby").within_service_radius);
        // ~69 miles away with the default 25 mile radius
        assert!(!by_id("other").within_service_radius);
        assert!(!by_id("unknown").within_service_radius);
        assert_eq!(by_id("nearby").formatted_distance.as_deref(), Some("7 mi"));
    }

    #[test]
    fn test_tier_badges_only_when_requested() {
        let pool = vec![at("a", PlacementTier::Premium, 0.0, 0.0)];

        let page = run(&pool, &origin(), &SearchRequest::default());
        assert_eq!(page.results[0].tier_badge, None);

        let request = SearchRequest::builder().show_tier_badges(true).build();
        let page = run(&pool, &origin(), &request);
        assert_eq!(page.results[0].tier_badge, Some("Premium"));
        assert_eq!(page.results[0].formatted_distance.as_deref(), Some("< 1 mi"));
    }

    #[test]
    fn test_rank_bulk_matches_sequential() {
        let pool = vec![
            at("a", PlacementTier::Free, 0.0, 0.1),
            at("b", PlacementTier::Featured, 0.0, 0.2),
        ];
        let searches = vec![
            (SearchRequest::default(), origin()),
            (
                SearchRequest::builder().query("a").build(),
                ResolvedOrigin::unresolved(),
            ),
        ];
        let config = RankingConfig::default();

        let pages = rank_bulk(&pool, &searches, &config);
        assert_eq!(pages.len(), 2);
        for (page, (request, origin)) in pages.iter().zip(&searches) {
            assert_eq!(page, &search_pool(&pool, origin, request, &config));
        }
    }
}
