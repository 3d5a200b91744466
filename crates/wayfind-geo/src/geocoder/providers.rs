//! Response parsers for the supported geocoding APIs.
//!
//! Each parser takes the decoded JSON body and returns the first match, or
//! `None` when the provider reported no usable result.

use serde_json::Value;

use super::GeocodingResult;

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Google Geocoding API (`/maps/api/geocode/json`).
#[must_use]
pub fn parse_google(body: &Value) -> Option<GeocodingResult> {
    if body.get("status").and_then(Value::as_str) != Some("OK") {
        return None;
    }
    let result = body.get("results")?.as_array()?.first()?;
    let location = result.pointer("/geometry/location")?;

    let mut city = None;
    let mut state = None;
    let mut postal_code = None;
    let mut country = None;

    for component in result
        .get("address_components")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let has_type = |wanted: &str| {
            component
                .get("types")
                .and_then(Value::as_array)
                .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(wanted)))
        };

        if has_type("locality") {
            city = str_field(component, "long_name");
        }
        if has_type("administrative_area_level_1") {
            state = str_field(component, "short_name");
        }
        if has_type("postal_code") {
            postal_code = str_field(component, "long_name");
        }
        if has_type("country") {
            country = str_field(component, "short_name");
        }
    }

    Some(GeocodingResult {
        latitude: location.get("lat")?.as_f64()?,
        longitude: location.get("lng")?.as_f64()?,
        formatted_address: str_field(result, "formatted_address").unwrap_or_default(),
        city,
        state,
        postal_code,
        country,
    })
}

/// Mapbox Places API (`/geocoding/v5/mapbox.places`).
#[must_use]
pub fn parse_mapbox(body: &Value) -> Option<GeocodingResult> {
    let feature = body.get("features")?.as_array()?.first()?;
    // Mapbox orders the center as [longitude, latitude]
    let center = feature.get("center")?.as_array()?;
    let longitude = center.first()?.as_f64()?;
    let latitude = center.get(1)?.as_f64()?;

    let mut city = None;
    let mut state = None;
    let mut postal_code = None;
    let mut country = None;

    for ctx in feature
        .get("context")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let Some(id) = ctx.get("id").and_then(Value::as_str) else {
            continue;
        };
        if id.starts_with("place.") {
            city = str_field(ctx, "text");
        } else if id.starts_with("region.") {
            state = str_field(ctx, "short_code")
                .map(|code| code.trim_start_matches("US-").to_ascii_uppercase());
        } else if id.starts_with("postcode.") {
            postal_code = str_field(ctx, "text");
        } else if id.starts_with("country.") {
            country = str_field(ctx, "short_code").map(|code| code.to_ascii_uppercase());
        }
    }

    Some(GeocodingResult {
        latitude,
        longitude,
        formatted_address: str_field(feature, "place_name").unwrap_or_default(),
        city,
        state,
        postal_code,
        country,
    })
}

/// OpenCage Geocoding API (`/geocode/v1/json`).
#[must_use]
pub fn parse_opencage(body: &Value) -> Option<GeocodingResult> {
    let result = body.get("results")?.as_array()?.first()?;
    let geometry = result.get("geometry")?;
    let components = result.get("components");

    let component = |key: &str| components.and_then(|c| str_field(c, key));

    Some(GeocodingResult {
        latitude: geometry.get("lat")?.as_f64()?,
        longitude: geometry.get("lng")?.as_f64()?,
        formatted_address: str_field(result, "formatted").unwrap_or_default(),
        city: component("city")
            .or_else(|| component("town"))
            .or_else(|| component("village")),
        state: component("state_code"),
        postal_code: component("postcode"),
        country: component("country_code").map(|code| code.to_ascii_uppercase()),
    })
}
