//! Geographic primitives for Wayfind listing discovery.
//!
//! This crate holds everything the ranking core needs to know about places:
//! validated [`Coordinates`], great-circle distance in statute miles, the US
//! state table used to canonicalise stored locations, and the optional
//! [`Geocoder`] capability that turns free-text locations into coordinates.
//!
//! ```rust
//! use wayfind_geo::{Coordinates, distance_miles, format_distance};
//!
//! let edison = Coordinates::new(40.5187, -74.4121)?;
//! let princeton = Coordinates::new(40.3573, -74.6672)?;
//!
//! let miles = distance_miles(edison, princeton);
//! assert_eq!(format_distance(miles), "17 mi");
//! # Ok::<(), wayfind_geo::GeoError>(())
//! ```
//!
//! Geocoding is never required. When no provider is configured the
//! [`UnconfiguredGeocoder`] answers every lookup with
//! [`GeocodeError::NotConfigured`], and callers fall back to text matching.

mod coordinates;
pub mod distance;
mod error;
pub mod geocoder;
mod normalize;
pub mod states;

pub use coordinates::Coordinates;
pub use distance::{
    BoundingBox, EARTH_RADIUS_MILES, distance, distance_miles, format_distance, is_within_radius,
    within_radius,
};
pub use error::{GeoError, GeocodeError, Result};
#[cfg(feature = "http")]
pub use geocoder::HttpGeocoder;
pub use geocoder::{
    CachingGeocoder, DEFAULT_GEOCODER_TIMEOUT, Geocoder, GeocoderConfig, GeocoderProvider,
    GeocodingResult, UnconfiguredGeocoder, geocode_city_state, geocode_postal_code,
};
pub use normalize::{NormalizedLocation, RawLocation, format_location_label, normalize_location};
pub use states::{
    StateForms, US_STATES, UsState, lookup_state, state_code, state_forms, state_name, state_slug,
};
