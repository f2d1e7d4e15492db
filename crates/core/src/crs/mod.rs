//! Coordinate Reference System handling

mod transform;

pub use transform::Transform;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Coordinate Reference System, identified by EPSG code.
///
/// The toolkit works with two families: WGS84 geographic (EPSG:4326), in which
/// all vector input is expected, and WGS84/UTM zones (EPSG:326xx north,
/// EPSG:327xx south), used for metric area and centroid computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// WGS84 / UTM zone CRS (EPSG:326xx north, EPSG:327xx south)
    pub fn utm(zone: u32, south: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidParameter {
                name: "zone",
                value: zone.to_string(),
                reason: "UTM zone must be in 1..=60".into(),
            });
        }
        let base = if south { 32700 } else { 32600 };
        Ok(Self::from_epsg(base + zone))
    }

    /// The UTM zone naturally containing a WGS84 point.
    ///
    /// Zone from longitude, hemisphere from latitude.
    pub fn utm_for(lon: f64, lat: f64) -> Self {
        let zone = (((lon + 180.0) / 6.0).floor() as i64).clamp(0, 59) as u32 + 1;
        let base = if lat < 0.0 { 32700 } else { 32600 };
        Self::from_epsg(base + zone)
    }

    /// Parse an authority identifier such as "EPSG:4326" (a bare code also works)
    pub fn parse(s: &str) -> Result<Self> {
        let code = s
            .trim()
            .strip_prefix("EPSG:")
            .or_else(|| s.trim().strip_prefix("epsg:"))
            .unwrap_or(s.trim());
        code.parse::<u32>()
            .map(Self::from_epsg)
            .map_err(|_| Error::UnsupportedCrs(s.to_string()))
    }

    /// Get the EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// True for geographic (degree-unit) CRS
    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }

    /// UTM zone info if this is a UTM CRS: `Some((zone, is_south))`
    pub fn utm_zone(&self) -> Option<(u32, bool)> {
        match self.epsg {
            32601..=32660 => Some((self.epsg - 32600, false)),
            32701..=32760 => Some((self.epsg - 32700, true)),
            _ => None,
        }
    }

    /// Authority identifier string for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
