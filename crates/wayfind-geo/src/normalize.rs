use tracing::debug;

use crate::{coordinates::Coordinates, states::state_code};

/// A stored location record as it arrives from storage.
///
/// State may be a code, full name or slug; either coordinate column may be
/// null.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RawLocation {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Canonical `(state code, city, coordinates)` triple. Any field may be null.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedLocation {
    pub state_code: Option<&'static str>,
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl NormalizedLocation {
    /// `"City, ST"` style label for display.
    #[must_use]
    pub fn label(&self) -> String {
        format_location_label(self.city.as_deref(), self.state_code)
    }
}

/// Best-effort canonicalisation of a stored location. Never fails.
///
/// Coordinates are kept verbatim only when both are present and in range;
/// unknown state spellings yield `state_code = None` without affecting the
/// other fields.
#[must_use]
pub fn normalize_location(raw: &RawLocation) -> NormalizedLocation {
    let coordinates = Coordinates::from_parts(raw.latitude, raw.longitude);
    if coordinates.is_none() && raw.latitude.is_some() && raw.longitude.is_some() {
        debug!(
            latitude = ?raw.latitude,
            longitude = ?raw.longitude,
            "Dropping out-of-range coordinates"
        );
    }

    let state_code = raw.state.as_deref().and_then(|state| {
        let code = state_code(state);
        if code.is_none() && !state.trim().is_empty() {
            debug!(state, "Unrecognised state value");
        }
        code
    });

    let city = raw
        .city
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(ToString::to_string);

    NormalizedLocation {
        state_code,
        city,
        coordinates,
    }
}

/// Formats `"City, ST"`, falling back to whichever half is present.
///
/// ```rust
/// use wayfind_geo::format_location_label;
///
/// assert_eq!(format_location_label(Some("Edison"), Some("NJ")), "Edison, NJ");
/// assert_eq!(format_location_label(None, Some("NJ")), "NJ");
/// assert_eq!(format_location_label(None, None), "");
/// ```
#[must_use]
pub fn format_location_label(city: Option<&str>, state: Option<&str>) -> String {
    let city = city.map(str::trim).filter(|c| !c.is_empty());
    let state = state.map(str::trim).filter(|s| !s.is_empty());
    match (city, state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (None, Some(state)) => state.to_string(),
        (Some(city), None) => city.to_string(),
        (None, None) => String::new(),
    }
}
