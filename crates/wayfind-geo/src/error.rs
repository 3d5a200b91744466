use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("Geocoder error: {0}")]
    Geocoder(#[from] GeocodeError),
}

/// Failures surfaced by a [`crate::Geocoder`].
///
/// Only [`GeocodeError::NotConfigured`] and [`GeocodeError::NotFound`] are
/// returned by the bundled geocoders; transport, decode and timeout failures
/// are folded into `NotFound` at the adapter boundary.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("No geocoding provider is configured")]
    NotConfigured,
    #[error("No geocoding match for the given address")]
    NotFound,
    #[error("Unsupported geocoding provider: {0}")]
    UnsupportedProvider(String),
    #[error("Invalid provider endpoint: {0}")]
    InvalidEndpoint(String),
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GeocodeError {
    /// Whether callers should continue with text-only matching.
    ///
    /// Every geocoder failure is non-fatal for search.
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::NotFound)
    }
}
