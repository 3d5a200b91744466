//! The main search interface.
//!
//! [`ListingSearcher`] ties the pipeline together: it resolves the request's
//! origin through its geocoder, filters the candidate pool, scores and ranks
//! the survivors and returns one [`ResultPage`].
//!
//! # Quick Start
//!
//! ```rust
//! use wayfind::{Candidate, ListingSearcher, PlacementTier, RawLocation, SearchRequest};
//!
//! let pool = vec![
//!     Candidate::new("1", "Bright Steps ABA")
//!         .with_location(RawLocation::new("Edison", "NJ").with_coordinates(40.52, -74.41)),
//!     Candidate::new("2", "Little Voices Speech")
//!         .with_tier(PlacementTier::Featured)
//!         .with_location(RawLocation::new("Princeton", "NJ")),
//! ];
//!
//! let searcher = ListingSearcher::new();
//! let request = SearchRequest::builder().near("Edison, NJ").build();
//! let page = searcher.search_blocking(&pool, &request)?;
//!
//! assert_eq!(page.total_count, 2);
//! assert_eq!(page.results[0].candidate.id.as_str(), "2");
//! assert!(!page.used_geolocation);
//! # Ok::<(), wayfind::error::WayfindError>(())
//! ```

use std::{fmt, sync::Arc};

use tracing::{info, instrument};
#[cfg(feature = "http")]
use wayfind_geo::{GeocoderConfig, HttpGeocoder};
use wayfind_geo::{Geocoder, UnconfiguredGeocoder};

use crate::{
    config::RankingConfig,
    listing::Candidate,
    origin::{ResolvedOrigin, resolve_origin},
    search::{ResultPage, SearchRequest, rank_bulk, search_pool},
};

/// Searches candidate pools for listings.
///
/// Cheap to clone; the geocoder is shared.
///
/// # Examples
///
/// With a custom configuration:
/// ```rust
/// use wayfind::{ListingSearcher, RankingConfigBuilder};
///
/// let config = RankingConfigBuilder::job_board()
///     .relevance_weights(0.55, 0.45)?
///     .build();
/// let searcher = ListingSearcher::new().with_config(config);
/// assert!(!searcher.geocoding_enabled());
/// # Ok::<(), wayfind::config::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct ListingSearcher {
    config: RankingConfig,
    geocoder: Arc<dyn Geocoder>,
}

impl fmt::Debug for ListingSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingSearcher")
            .field("config", &self.config)
            .field("geocoder", &self.geocoder.provider())
            .finish()
    }
}

impl Default for ListingSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingSearcher {
    /// A searcher with default configuration and geocoding disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RankingConfig::default(),
            geocoder: Arc::new(UnconfiguredGeocoder),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Arc::new(geocoder);
        self
    }

    pub fn with_shared_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Builds a searcher whose geocoder comes from the environment.
    ///
    /// Without credentials the searcher still works, in degraded mode.
    #[cfg(feature = "http")]
    #[instrument(name = "ListingSearcher from env", level = "info")]
    pub fn from_env() -> crate::Result<Self> {
        let searcher = Self::new();
        match GeocoderConfig::from_env()? {
            Some(config) => {
                info!(provider = %config.provider, "Geocoding enabled");
                Ok(searcher.with_geocoder(HttpGeocoder::new(config)?))
            }
            None => {
                info!("No geocoder credentials found, searching without geolocation");
                Ok(searcher)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    #[must_use]
    pub fn geocoding_enabled(&self) -> bool {
        self.geocoder.provider().is_some()
    }

    /// Resolves the request's origin with this searcher's geocoder.
    pub async fn resolve_origin(&self, request: &SearchRequest) -> ResolvedOrigin {
        resolve_origin(self.geocoder.as_ref(), request.origin.as_ref()).await
    }

    /// Resolves the origin, filters and ranks. Never fails: geocoding
    /// problems degrade to a distance-free search.
    #[instrument(name = "Search", level = "info", skip_all, fields(pool = pool.len(), query = ?request.query))]
    pub async fn search(&self, pool: &[Candidate], request: &SearchRequest) -> ResultPage {
        let t_search = std::time::Instant::now();
        let origin = self.resolve_origin(request).await;
        let page = self.search_with_origin(pool, request, &origin);
        info!(
            total_count = page.total_count,
            used_geolocation = page.used_geolocation,
            elapsed = ?t_search.elapsed(),
            "Search complete"
        );
        page
    }

    /// Filters and ranks against an origin the caller already resolved.
    #[must_use]
    pub fn search_with_origin(
        &self,
        pool: &[Candidate],
        request: &SearchRequest,
        origin: &ResolvedOrigin,
    ) -> ResultPage {
        search_pool(pool, origin, request, &self.config)
    }

    /// Runs several pre-resolved searches against one pool in parallel.
    #[must_use]
    pub fn search_bulk(
        &self,
        pool: &[Candidate],
        searches: &[(SearchRequest, ResolvedOrigin)],
    ) -> Vec<ResultPage> {
        rank_bulk(pool, searches, &self.config)
    }

    /// Synchronous [`ListingSearcher::search`] on a private current-thread
    /// runtime.
    ///
    /// Fails when called from inside an async runtime (use
    /// [`ListingSearcher::search`] there) or when the runtime cannot be
    /// created.
    #[cfg(feature = "http")]
    pub fn search_blocking(
        &self,
        pool: &[Candidate],
        request: &SearchRequest,
    ) -> crate::Result<ResultPage> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(anyhow::anyhow!(
                "search_blocking called inside an async runtime, await search instead"
            )
            .into());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.search(pool, request)))
    }
}
