use std::fmt;

use crate::error::{GeoError, Result};

/// A validated point on the globe, in decimal degrees.
///
/// Construction goes through [`Coordinates::new`], so every value of this type
/// has a finite latitude in `[-90, 90]` and a finite longitude in
/// `[-180, 180]`. "Unknown location" is expressed as `Option<Coordinates>`,
/// never as a sentinel such as `(0, 0)`.
///
/// # Examples
///
/// ```rust
/// use wayfind_geo::Coordinates;
///
/// let edison = Coordinates::new(40.5187, -74.4121)?;
/// assert_eq!(edison.latitude(), 40.5187);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// # Ok::<(), wayfind_geo::GeoError>(())
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Builds coordinates from a pair of nullable columns.
    ///
    /// Returns `None` unless both halves are present and in range.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        let (latitude, longitude) = latitude.zip(longitude)?;
        Self::new(latitude, longitude).ok()
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the point as a `(latitude, longitude)` tuple.
    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Coordinates {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            latitude: f64,
            longitude: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.latitude, raw.longitude).map_err(serde::de::Error::custom)
    }
}
