//! Geocoding capability.
//!
//! Search treats geocoding as optional: [`UnconfiguredGeocoder`] stands in when
//! no provider credentials exist, and every failure of the network-backed
//! [`HttpGeocoder`] surfaces as [`GeocodeError::NotFound`] so callers can fall
//! back to text matching.

use std::{fmt, time::Duration};

use futures::{FutureExt, future::BoxFuture};

use crate::{
    coordinates::Coordinates,
    error::{GeocodeError, Result as GeoResult},
};

mod cache;
#[cfg(feature = "http")]
mod http;
pub mod providers;

pub use cache::CachingGeocoder;
#[cfg(feature = "http")]
pub use http::HttpGeocoder;

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Default bound on a single provider round trip.
pub const DEFAULT_GEOCODER_TIMEOUT: Duration = Duration::from_millis(4000);

/// A geocoded place.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub city: Option<String>,
    /// State as reported by the provider (usually the two-letter code)
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl GeocodingResult {
    /// Validated coordinates of the match.
    pub fn coordinates(&self) -> GeoResult<Coordinates> {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Converts free-text addresses into coordinates and place fields.
///
/// Implementations must bound their own latency; a call that cannot finish in
/// time resolves to [`GeocodeError::NotFound`].
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<GeocodingResult>>;

    /// The backing provider, or `None` when geocoding is unavailable.
    fn provider(&self) -> Option<GeocoderProvider> {
        None
    }
}

/// Geocodes `"City, ST, USA"`.
pub async fn geocode_city_state(
    geocoder: &dyn Geocoder,
    city: &str,
    state: &str,
) -> Result<GeocodingResult> {
    let address = format!("{}, {}, USA", city.trim(), state.trim());
    geocoder.geocode(&address).await
}

/// Geocodes a ZIP code within the US.
pub async fn geocode_postal_code(
    geocoder: &dyn Geocoder,
    postal_code: &str,
) -> Result<GeocodingResult> {
    let address = format!("{}, USA", postal_code.trim());
    geocoder.geocode(&address).await
}

/// The no-op geocoder used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGeocoder;

impl Geocoder for UnconfiguredGeocoder {
    fn geocode<'a>(&'a self, _address: &'a str) -> BoxFuture<'a, Result<GeocodingResult>> {
        futures::future::ready(Err(GeocodeError::NotConfigured)).boxed()
    }
}

/// Supported third-party geocoding APIs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocoderProvider {
    Google,
    Mapbox,
    OpenCage,
}

impl GeocoderProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mapbox" => Ok(Self::Mapbox),
            "opencage" => Ok(Self::OpenCage),
            other => Err(GeocodeError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for GeocoderProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Google => "google",
            Self::Mapbox => "mapbox",
            Self::OpenCage => "opencage",
        };
        f.write_str(name)
    }
}

/// Credentials and limits for a network geocoder.
#[derive(Clone)]
pub struct GeocoderConfig {
    pub provider: GeocoderProvider,
    pub api_key: String,
    pub timeout: Duration,
    /// Replaces the provider's public endpoint, e.g. for a proxy or a
    /// self-hosted mirror
    pub base_url: Option<String>,
}

impl fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeocoderConfig {
    pub fn new(provider: GeocoderProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            timeout: DEFAULT_GEOCODER_TIMEOUT,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends requests to `base_url` instead of the provider's public API.
    /// The provider's query format is unchanged.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Reads `GEOCODER_PROVIDER`, `GEOCODER_API_KEY` (or `GOOGLE_MAPS_API_KEY`)
    /// and `GEOCODER_TIMEOUT_MS` from the process environment.
    ///
    /// Returns `Ok(None)` when no key is set, which callers treat as
    /// "geocoding unavailable".
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GeocoderConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = non_empty("GEOCODER_PROVIDER")
            .map(|value| GeocoderProvider::parse(&value))
            .transpose()?;

        let api_key = match (non_empty("GEOCODER_API_KEY"), provider) {
            (Some(key), _) => key,
            (None, None | Some(GeocoderProvider::Google)) => match non_empty("GOOGLE_MAPS_API_KEY")
            {
                Some(key) => key,
                None => return Ok(None),
            },
            (None, Some(_)) => return Ok(None),
        };

        let timeout = non_empty("GEOCODER_TIMEOUT_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|millis| *millis > 0)
            .map_or(DEFAULT_GEOCODER_TIMEOUT, Duration::from_millis);

        Ok(Some(Self {
            provider: provider.unwrap_or(GeocoderProvider::Google),
            api_key: api_key.trim().to_string(),
            timeout,
            base_url: None,
        }))
    }
}
