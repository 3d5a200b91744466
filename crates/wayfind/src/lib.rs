//! Wayfind - Listing Discovery & Ranking
//!
//! Wayfind takes a family's or job-seeker's search criteria and returns a
//! correctly ordered, paginated page of provider listings or job postings.
//! Ordering respects paid placement first, then geographic proximity, then
//! textual relevance, and degrades gracefully when geocoding is unavailable or
//! a listing lacks coordinates.
//!
//! # Quick Start
//!
//! ```rust
//! use wayfind::{Candidate, Coordinates, ListingSearcher, PlacementTier, RawLocation, SearchRequest};
//!
//! let pool = vec![
//!     Candidate::new("near", "Bright Steps ABA")
//!         .with_location(RawLocation::new("Edison", "NJ").with_coordinates(40.52, -74.41)),
//!     Candidate::new("far", "Harbor Speech")
//!         .with_tier(PlacementTier::Premium)
//!         .with_location(RawLocation::new("Brooklyn", "NY").with_coordinates(40.68, -73.94)),
//! ];
//!
//! let searcher = ListingSearcher::new();
//! let request = SearchRequest::builder()
//!     .near_coordinates(Coordinates::new(40.5187, -74.4121)?)
//!     .radius(50.0)
//!     .build();
//!
//! let origin = wayfind::ResolvedOrigin::supplied(Coordinates::new(40.5187, -74.4121)?);
//! let page = searcher.search_with_origin(&pool, &request, &origin);
//!
//! // Premium placement outranks proximity
//! assert_eq!(page.results[0].candidate.id.as_str(), "far");
//! assert_eq!(page.results[1].formatted_distance.as_deref(), Some("< 1 mi"));
//! assert!(page.used_geolocation);
//! # Ok::<(), wayfind::error::WayfindError>(())
//! ```
//!
//! # Pipeline
//!
//! - **Origin resolution**: explicit coordinates, a geocoder lookup, or a
//!   state recognised in the location text
//! - **Candidate filtering**: published status, attribute constraints, service
//!   area, recency and a hard radius
//! - **Relevance scoring**: bounded name/headline and label match
//! - **Ranking**: tier, distance, relevance, id; then pagination
//!
//! Geographic primitives and geocoders live in the [`geo`] subcrate.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod config;
mod core;
pub mod error;
mod listing;
mod origin;
mod search;
#[cfg(any(test, feature = "test_data"))]
pub mod test_data;

pub use crate::core::ListingSearcher;

pub use config::{ConfigError, RankingConfig, RankingConfigBuilder, RelevanceWeights};
pub use error::{Result, WayfindError};
pub use listing::{
    Attribute, Candidate, CandidateId, CandidateKind, ListingStatus, PlacementTier, PlanTier,
    ServiceMode, SubscriptionStatus,
};
pub use origin::{OriginSource, ResolvedOrigin, resolve_origin, resolve_state_text};
pub use search::{
    AttributeFilters, OriginInput, PostedWithin, RankedResult, RelevanceScorer, ResultPage,
    ResultSection, SearchRequest, SearchRequestBuilder, SectionCounts, filter_candidates, rank,
    rank_bulk, search_pool,
};
pub use wayfind_geo as geo;
pub use wayfind_geo::{
    Coordinates, Geocoder, GeocoderConfig, GeocoderProvider, GeocodingResult, NormalizedLocation,
    RawLocation, UnconfiguredGeocoder, distance_miles, format_distance, normalize_location,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Wayfind library.
///
/// Installs a `tracing` fmt subscriber once per process. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Examples
///
/// ```rust
/// use tracing::Level;
/// use wayfind::init_logging;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), wayfind::error::WayfindError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    })
}
