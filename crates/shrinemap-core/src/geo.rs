//! Geographic primitives shared by the normalizer, the presenter and the
//! HTTP surface.
//!
//! Coordinates are stored as `(lat, lng)`. GeoJSON's `(lng, lat)` ordering is
//! translated at the parsing boundary and never leaks past it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite and neither is exactly zero.
    ///
    /// A zero component almost always means an empty or degenerate ring that
    /// averaged to nothing, so it is treated as unusable rather than as the
    /// equator or the prime meridian.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat != 0.0 && self.lng != 0.0
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = String;

    /// Parses `"lat,lng"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_f64_list(s)?;
        match parts.as_slice() {
            [lat, lng] => Ok(Self::new(*lat, *lng)),
            _ => Err(format!("expected \"lat,lng\", got {} values", parts.len())),
        }
    }
}

/// The rectangular region records must fall inside to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl RegionBounds {
    /// Mainland Japan plus Okinawa and the outlying islands: 24–46°N,
    /// 123–146°E.
    #[must_use]
    pub const fn japan() -> Self {
        Self {
            min_lat: 24.0,
            min_lng: 123.0,
            max_lat: 46.0,
            max_lng: 146.0,
        }
    }

    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::japan()
    }
}

impl FromStr for RegionBounds {
    type Err = String;

    /// Parses `"min_lat,min_lng,max_lat,max_lng"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_f64_list(s)?;
        let [min_lat, min_lng, max_lat, max_lng] = parts.as_slice() else {
            return Err(format!(
                "expected \"min_lat,min_lng,max_lat,max_lng\", got {} values",
                parts.len()
            ));
        };
        if min_lat > max_lat || min_lng > max_lng {
            return Err("minimum corner must not exceed maximum corner".to_string());
        }
        Ok(Self {
            min_lat: *min_lat,
            min_lng: *min_lng,
            max_lat: *max_lat,
            max_lng: *max_lng,
        })
    }
}

/// The smallest box covering a set of points, used for viewport fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// A degenerate box around a single point.
    #[must_use]
    pub const fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

fn parse_f64_list(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number \"{}\": {e}", part.trim()))
        })
        .collect()
}
