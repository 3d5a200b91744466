//! Great-circle distance and its display form.
//!
//! All distances are statute miles. Display formatting lives here so every
//! result card (directory listing or job posting) renders distances the same
//! way.

use crate::{coordinates::Coordinates, error::Result};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Slack applied to radius comparisons so a point sitting exactly on the
/// boundary is not lost to floating-point noise in the haversine terms.
pub const RADIUS_TOLERANCE_MILES: f64 = 1e-6;

/// Approximate miles per degree of latitude, used for bounding boxes.
const MILES_PER_DEGREE: f64 = 69.0;

/// Haversine distance between two validated points.
///
/// Symmetric and non-negative for every input pair.
#[must_use]
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lng = (to.longitude() - from.longitude()).to_radians();

    let half_lat = (delta_lat / 2.0).sin();
    let half_lng = (delta_lng / 2.0).sin();
    let a = half_lat * half_lat + lat1.cos() * lat2.cos() * half_lng * half_lng;
    // Rounding can push `a` a hair outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Haversine distance from raw degree values.
///
/// Fails fast with [`crate::GeoError::InvalidCoordinate`] when either point is
/// out of range.
///
/// # Examples
///
/// ```rust
/// use wayfind_geo::distance;
///
/// let miles = distance(40.7128, -74.0060, 40.5187, -74.4121)?;
/// assert!((miles - 24.9).abs() < 1.0);
/// # Ok::<(), wayfind_geo::GeoError>(())
/// ```
pub fn distance(
    origin_lat: f64,
    origin_lng: f64,
    target_lat: f64,
    target_lng: f64,
) -> Result<f64> {
    let origin = Coordinates::new(origin_lat, origin_lng)?;
    let target = Coordinates::new(target_lat, target_lng)?;
    Ok(distance_miles(origin, target))
}

/// Renders a distance for result cards: `"< 1 mi"` below one mile, otherwise
/// the nearest whole mile.
#[must_use]
pub fn format_distance(miles: f64) -> String {
    if miles < 1.0 {
        "< 1 mi".to_string()
    } else {
        format!("{} mi", miles.round() as u64)
    }
}

/// Whether `point` lies within `radius_miles` of `center` (boundary inclusive).
#[must_use]
pub fn is_within_radius(center: Coordinates, point: Coordinates, radius_miles: f64) -> bool {
    within_radius(distance_miles(center, point), radius_miles)
}

/// Boundary-inclusive radius comparison on an already computed distance.
#[must_use]
pub fn within_radius(distance_miles: f64, radius_miles: f64) -> bool {
    distance_miles <= radius_miles + RADIUS_TOLERANCE_MILES
}

/// A latitude/longitude rectangle enclosing a search circle.
///
/// Storage layers can use it as a coarse pre-filter before the exact
/// haversine check.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn around(center: Coordinates, radius_miles: f64) -> Self {
        let lat_delta = radius_miles / MILES_PER_DEGREE;
        let cos_lat = center.latitude().to_radians().cos().abs();
        // Near the poles the longitude span degenerates to the whole globe
        let lng_delta = if cos_lat < f64::EPSILON {
            180.0
        } else {
            (radius_miles / (MILES_PER_DEGREE * cos_lat)).min(180.0)
        };

        Self {
            min_lat: (center.latitude() - lat_delta).max(-90.0),
            max_lat: (center.latitude() + lat_delta).min(90.0),
            min_lng: center.longitude() - lng_delta,
            max_lng: center.longitude() + lng_delta,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude())
            && (self.min_lng..=self.max_lng).contains(&point.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn test_zero_distance_for_identical_points() {
        let p = point(40.5187, -74.4121);
        assert_eq!(distance_miles(p, p), 0.0);
    }

    #[test]
    fn test_known_city_pair() {
        // New York City to Los Angeles is roughly 2,445 statute miles
        let nyc = point(40.7128, -74.0060);
        let la = point(34.0522, -118.2437);
        let miles = distance_miles(nyc, la);
        assert!((miles - 2445.0).abs() < 10.0, "got {miles}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let miles = distance_miles(point(0.0, 0.0), point(1.0, 0.0));
        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((miles - expected).abs() < 1e-9);
    }

    #[test]
    fn test_raw_distance_rejects_invalid_input() {
        assert!(distance(95.0, 0.0, 0.0, 0.0).is_err());
        assert!(distance(0.0, 0.0, 0.0, 200.0).is_err());
        assert!(distance(0.0, 0.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "< 1 mi");
        assert_eq!(format_distance(0.99), "< 1 mi");
        assert_eq!(format_distance(1.0), "1 mi");
        assert_eq!(format_distance(1.4), "1 mi");
        assert_eq!(format_distance(11.6), "12 mi");
        assert_eq!(format_distance(12.0), "12 mi");
        assert_eq!(format_distance(249.5), "250 mi");
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let origin = point(0.0, 0.0);
        let ten_miles_north = point((10.0 / EARTH_RADIUS_MILES).to_degrees(), 0.0);
        let just_past = point((10.01 / EARTH_RADIUS_MILES).to_degrees(), 0.0);

        assert!(is_within_radius(origin, ten_miles_north, 10.0));
        assert!(!is_within_radius(origin, just_past, 10.0));
    }

    #[test]
    fn test_bounding_box_contains_points_inside_radius() {
        let center = point(40.5187, -74.4121);
        let bbox = BoundingBox::around(center, 25.0);

        assert!(bbox.contains(center));
        assert!(bbox.contains(point(40.7, -74.3)));
        assert!(!bbox.contains(point(42.0, -74.4)));
        assert!(bbox.min_lat < center.latitude() && bbox.max_lat > center.latitude());
        assert!(bbox.min_lng < center.longitude() && bbox.max_lng > center.longitude());
    }

    #[test]
    fn test_bounding_box_at_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(point(90.0, 0.0), 10.0);
        assert_eq!(bbox.max_lat, 90.0);
        assert!(bbox.contains(point(89.9, 179.0)));
    }

    fn coordinate_strategy() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| point(lat, lng))
    }

    proptest! {
        #[test]
        fn test_distance_is_symmetric(a in coordinate_strategy(), b in coordinate_strategy()) {
            let ab = distance_miles(a, b);
            let ba = distance_miles(b, a);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn test_distance_is_bounded(a in coordinate_strategy(), b in coordinate_strategy()) {
            let miles = distance_miles(a, b);
            prop_assert!(miles >= 0.0);
            // Never more than half the circumference
            prop_assert!(miles <= std::f64::consts::PI * EARTH_RADIUS_MILES + 1e-6);
        }

        #[test]
        fn test_bounding_box_covers_circle(
            lat in -60.0f64..=60.0,
            lng in -170.0f64..=170.0,
            bearing in 0.0f64..360.0,
            fraction in 0.0f64..0.99,
        ) {
            let center = point(lat, lng);
            let radius = 30.0;
            // Step along a bearing by a fraction of the radius
            let step = radius * fraction / EARTH_RADIUS_MILES;
            let (sin_b, cos_b) = bearing.to_radians().sin_cos();
            let lat1 = center.latitude().to_radians();
            let lat2 = (lat1.sin() * step.cos() + lat1.cos() * step.sin() * cos_b).asin();
            let lng2 = center.longitude().to_radians()
                + (sin_b * step.sin() * lat1.cos()).atan2(step.cos() - lat1.sin() * lat2.sin());
            let inside = point(lat2.to_degrees(), lng2.to_degrees());

            prop_assert!(BoundingBox::around(center, radius).contains(inside));
        }
    }
}
