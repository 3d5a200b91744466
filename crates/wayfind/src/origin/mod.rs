//! Resolving the point a search is measured from.
//!
//! Explicit coordinates are used as-is. Free text goes to the geocoder first;
//! when geocoding is unavailable or finds nothing, the text is matched against
//! the US state table so searches like `"new-jersey"` still narrow by state.
//! Resolution never fails: the worst case is an [`OriginSource::Unresolved`]
//! origin and a degraded, distance-free search.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, warn};
use wayfind_geo::{Coordinates, Geocoder, format_location_label, state_code};

use crate::search::OriginInput;

/// Strips a trailing ZIP or ZIP+4 from free text.
static TRAILING_ZIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]*\b\d{5}(?:-\d{4})?\s*$").expect("valid ZIP pattern"));

/// How an origin was resolved.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginSource {
    /// Coordinates were part of the request
    Supplied,
    /// A geocoder call produced coordinates
    Geocoder,
    /// Only a state could be recognised in the text
    StateText,
    Unresolved,
}

/// The point a search is measured from. Computed once per request.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOrigin {
    pub coordinates: Option<Coordinates>,
    pub state_code: Option<&'static str>,
    /// Display label such as `"Edison, NJ"`
    pub label: Option<String>,
    pub source: OriginSource,
}

impl ResolvedOrigin {
    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            coordinates: None,
            state_code: None,
            label: None,
            source: OriginSource::Unresolved,
        }
    }

    #[must_use]
    pub fn supplied(coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            state_code: None,
            label: None,
            source: OriginSource::Supplied,
        }
    }

    #[must_use]
    pub fn state_only(code: &'static str) -> Self {
        Self {
            coordinates: None,
            state_code: Some(code),
            label: Some(code.to_string()),
            source: OriginSource::StateText,
        }
    }

    /// True only for coordinates from the request or a successful geocode.
    #[must_use]
    pub fn used_geolocation(&self) -> bool {
        self.coordinates.is_some()
            && matches!(self.source, OriginSource::Supplied | OriginSource::Geocoder)
    }
}

impl Default for ResolvedOrigin {
    fn default() -> Self {
        Self::unresolved()
    }
}

/// Resolves a request's origin input.
#[instrument(name = "Resolve origin", level = "debug", skip(geocoder))]
pub async fn resolve_origin(geocoder: &dyn Geocoder, input: Option<&OriginInput>) -> ResolvedOrigin {
    let text = match input {
        None => return ResolvedOrigin::unresolved(),
        Some(OriginInput::Coordinates(coordinates)) => {
            return ResolvedOrigin::supplied(*coordinates);
        }
        Some(OriginInput::Text(text)) => text.trim(),
    };
    if text.is_empty() {
        return ResolvedOrigin::unresolved();
    }

    match geocoder.geocode(text).await {
        Ok(place) => match place.coordinates() {
            Ok(coordinates) => {
                let state = place.state.as_deref().and_then(state_code);
                let label = format_location_label(place.city.as_deref(), state);
                info!(text, %coordinates, "Origin geocoded");
                return ResolvedOrigin {
                    coordinates: Some(coordinates),
                    state_code: state.or_else(|| resolve_state_text(text)),
                    label: Some(if label.is_empty() {
                        place.formatted_address
                    } else {
                        label
                    }),
                    source: OriginSource::Geocoder,
                };
            }
            Err(e) => warn!(error = %e, "Geocoder returned unusable coordinates"),
        },
        Err(e) if e.is_degradable() => {
            debug!(error = %e, "Geocoding unavailable, falling back to state text");
        }
        Err(e) => warn!(error = %e, "Geocoder failed, falling back to state text"),
    }

    resolve_state_text(text).map_or_else(
        || {
            debug!(text, "Origin could not be resolved");
            ResolvedOrigin::unresolved()
        },
        ResolvedOrigin::state_only,
    )
}

/// Recognises a state in free text: the whole text first, then the last
/// comma-separated segment with any trailing ZIP removed.
///
/// ```rust
/// use wayfind::resolve_state_text;
///
/// assert_eq!(resolve_state_text("new-jersey"), Some("NJ"));
/// assert_eq!(resolve_state_text("Edison, NJ 08817"), Some("NJ"));
/// assert_eq!(resolve_state_text("Edison"), None);
/// ```
#[must_use]
pub fn resolve_state_text(text: &str) -> Option<&'static str> {
    let text = text.trim();
    if let Some(code) = state_code(text) {
        return Some(code);
    }

    let without_zip = TRAILING_ZIP.replace(text, "");
    without_zip
        .rsplit(',')
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .and_then(state_code)
}
