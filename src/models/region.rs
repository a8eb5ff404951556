//! Geographic region of interest.
//!
//! A [`Region`] is an axis-aligned bounding box in WGS84 coordinates,
//! validated at construction. Two wire orderings exist and are easy to
//! confuse: drawing tools hand over `(west, south, east, north)`, the
//! backend expects `[south, west, north, east]`. This type is the single
//! place in the crate where that reordering happens; raw coordinate
//! arrays never cross component boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a set of bounds does not form a valid [`Region`].
#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("region coordinate is not a finite number")]
    NonFinite,
    #[error("region has an empty extent (south {south} >= north {north} or west {west} >= east {east})")]
    EmptyExtent {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
}

/// A validated bounding box. `south < north` and `west < east` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", try_from = "[f64; 4]")]
pub struct Region {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Region {
    /// Build a region from explicit bounds, rejecting degenerate boxes.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, RegionError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(RegionError::NonFinite);
        }
        if south >= north || west >= east {
            return Err(RegionError::EmptyExtent {
                south,
                west,
                north,
                east,
            });
        }
        Ok(Region {
            south,
            west,
            north,
            east,
        })
    }

    /// Accept a rectangle in map-drawn order.
    ///
    /// Invalid bounds yield `None`: a bad draw disables computation, it is
    /// never an error condition.
    pub fn from_drawn(west: f64, south: f64, east: f64, north: f64) -> Option<Self> {
        Region::new(south, west, north, east).ok()
    }

    /// Parse the drawing tool's `"west,south,east,north"` string form.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',').map(|p| p.trim().parse::<f64>());
        let west = parts.next()?.ok()?;
        let south = parts.next()?.ok()?;
        let east = parts.next()?.ok()?;
        let north = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Region::from_drawn(west, south, east, north)
    }

    /// The `[south, west, north, east]` order the backend expects.
    pub fn to_backend_order(&self) -> [f64; 4] {
        [self.south, self.west, self.north, self.east]
    }

    /// Parse the backend's `[south, west, north, east]` array form.
    pub fn from_backend_order(bbox: [f64; 4]) -> Result<Self, RegionError> {
        Region::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    /// Geometric center as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Whether the point lies inside the box, boundary inclusive.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

impl From<Region> for [f64; 4] {
    fn from(region: Region) -> Self {
        region.to_backend_order()
    }
}

impl TryFrom<[f64; 4]> for Region {
    type Error = RegionError;

    fn try_from(bbox: [f64; 4]) -> Result<Self, Self::Error> {
        Region::from_backend_order(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_ordering() {
        assert!(Region::new(48.0, 11.0, 48.2, 11.3).is_ok());
        assert!(matches!(
            Region::new(48.2, 11.0, 48.0, 11.3),
            Err(RegionError::EmptyExtent { .. })
        ));
        assert!(matches!(
            Region::new(48.0, 11.3, 48.2, 11.0),
            Err(RegionError::EmptyExtent { .. })
        ));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert_eq!(
            Region::new(f64::NAN, 11.0, 48.2, 11.3),
            Err(RegionError::NonFinite)
        );
        assert_eq!(
            Region::new(48.0, 11.0, f64::INFINITY, 11.3),
            Err(RegionError::NonFinite)
        );
    }

    #[test]
    fn test_zero_extent_is_rejected() {
        assert!(matches!(
            Region::new(48.0, 11.0, 48.0, 11.3),
            Err(RegionError::EmptyExtent { .. })
        ));
    }

    #[test]
    fn test_from_drawn_reorders_to_backend() {
        let region = Region::from_drawn(11.36, 48.06, 11.72, 48.25).unwrap();
        assert_eq!(region.to_backend_order(), [48.06, 11.36, 48.25, 11.72]);
    }

    #[test]
    fn test_from_drawn_invalid_is_none() {
        assert!(Region::from_drawn(11.72, 48.06, 11.36, 48.25).is_none());
        assert!(Region::from_drawn(11.36, 48.25, 11.72, 48.06).is_none());
        assert!(Region::from_drawn(f64::NAN, 48.06, 11.72, 48.25).is_none());
    }

    #[test]
    fn test_parse_comma_string() {
        let region = Region::parse("11.36, 48.06, 11.72, 48.25").unwrap();
        assert_eq!(region.to_backend_order(), [48.06, 11.36, 48.25, 11.72]);

        assert!(Region::parse("").is_none());
        assert!(Region::parse("11.36,48.06,11.72").is_none());
        assert!(Region::parse("11.36,48.06,11.72,48.25,0").is_none());
        assert!(Region::parse("a,b,c,d").is_none());
    }

    #[test]
    fn test_wire_round_trip() {
        let region = Region::from_backend_order([48.06, 11.36, 48.25, 11.72]).unwrap();
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(json, "[48.06,11.36,48.25,11.72]");
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
    }

    #[test]
    fn test_deserialize_rejects_invalid_box() {
        let result: Result<Region, _> = serde_json::from_str("[48.2,11.0,48.0,11.3]");
        assert!(result.is_err());
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let region = Region::new(48.0, 11.0, 48.2, 11.3).unwrap();
        assert!(region.contains(48.0, 11.0));
        assert!(region.contains(48.2, 11.3));
        assert!(region.contains(48.1, 11.15));
        assert!(!region.contains(47.99, 11.15));
        assert!(!region.contains(48.1, 11.31));
    }

    #[test]
    fn test_center() {
        let region = Region::new(48.0, 11.0, 48.2, 11.4).unwrap();
        let (lat, lon) = region.center();
        assert!((lat - 48.1).abs() < 1e-9);
        assert!((lon - 11.2).abs() < 1e-9);
    }
}
