//! Pure-Rust WGS84 ↔ UTM reprojection (Snyder 1987, USGS formulas).
//!
//! Covers EPSG 326xx (UTM North) and 327xx (UTM South), which is enough for
//! metric area and centroid computation anywhere the report workflow runs.
//! No external C dependencies (no libproj).

use geo::MapCoords;
use geo_types::{Coord, Geometry, Point};

use crate::crs::Crs;
use crate::error::{Error, Result};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

// ── Public API ───────────────────────────────────────────────────────────

/// A coordinate transform between two CRS.
///
/// Construction fails for unsupported pairs; application is then infallible.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    source: Crs,
    target: Crs,
    op: Op,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Identity,
    /// WGS84 (lon, lat) → UTM (easting, northing)
    Forward { zone: u32, south: bool },
    /// UTM (easting, northing) → WGS84 (lon, lat)
    Inverse { zone: u32, south: bool },
}

impl Transform {
    /// Build a transform from `source` to `target`.
    ///
    /// Supported: identity, WGS84 → UTM zone, UTM zone → WGS84.
    pub fn new(source: Crs, target: Crs) -> Result<Self> {
        let op = if source == target {
            Op::Identity
        } else if source.is_geographic() {
            let (zone, south) = target
                .utm_zone()
                .ok_or_else(|| Error::UnsupportedCrs(target.identifier()))?;
            Op::Forward { zone, south }
        } else if target.is_geographic() {
            let (zone, south) = source
                .utm_zone()
                .ok_or_else(|| Error::UnsupportedCrs(source.identifier()))?;
            Op::Inverse { zone, south }
        } else {
            return Err(Error::UnsupportedCrs(format!(
                "{} -> {}",
                source.identifier(),
                target.identifier()
            )));
        };
        Ok(Self { source, target, op })
    }

    pub fn source(&self) -> Crs {
        self.source
    }

    pub fn target(&self) -> Crs {
        self.target
    }

    /// Transform a single coordinate
    pub fn coord(&self, c: Coord<f64>) -> Coord<f64> {
        match self.op {
            Op::Identity => c,
            Op::Forward { zone, south } => {
                let (e, n) = wgs84_to_utm(c.x, c.y, zone, !south);
                Coord { x: e, y: n }
            }
            Op::Inverse { zone, south } => {
                let (lon, lat) = utm_to_wgs84(c.x, c.y, zone, !south);
                Coord { x: lon, y: lat }
            }
        }
    }

    /// Transform a point
    pub fn point(&self, p: Point<f64>) -> Point<f64> {
        Point(self.coord(p.0))
    }

    /// Transform every coordinate of a geometry
    pub fn geometry(&self, geom: &Geometry<f64>) -> Geometry<f64> {
        geom.map_coords(|c| self.coord(c))
    }
}

// ── Core projection (Snyder 1987, USGS Prof. Paper 1395, pp. 61-64) ─────

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    // Central meridian of the zone
    let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);

    // Meridional arc length M (Snyder eq. 3-21)
    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Easting (Snyder eq. 8-9)
    let easting = K0 * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2)
                * a4
                * a_coeff
                / 120.0)
        + FALSE_EASTING;

    // Northing (Snyder eq. 8-10)
    let northing = K0
        * (m
            + n * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    let northing = if north {
        northing
    } else {
        northing + FALSE_NORTHING_SOUTH
    };

    (easting, northing)
}

/// Convert UTM (easting, northing) in metres back to WGS84 (longitude,
/// latitude) in degrees. Snyder eqs. 8-17 to 8-25 (footpoint latitude).
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let m = y / K0;
    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let e1 = (1.0 - (1.0 - E2).sqrt()) / (1.0 + (1.0 - E2).sqrt());
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    // Footpoint latitude (Snyder eq. 3-26)
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let n1 = A / (1.0 - E2 * sin_phi1 * sin_phi1).sqrt();
    let r1 = A * (1.0 - E2) / (1.0 - E2 * sin_phi1 * sin_phi1).powi(3).sqrt();
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d4 = d2 * d2;
    let d6 = d4 * d2;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d2 * d / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                * d4
                * d
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

/// Meridional arc from equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e2 = E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Point};

    /// Helper: assert two values are within `tol` of each other.
    fn assert_close(a: f64, b: f64, tol: f64, msg: &str) {
        let diff = (a - b).abs();
        assert!(
            diff < tol,
            "{msg}: expected {b}, got {a}, diff {diff} exceeds tolerance {tol}"
        );
    }

    // Reference values from pyproj (PROJ 9.x):
    //   from pyproj import Transformer
    //   t = Transformer.from_crs(4326, 32630, always_xy=True)
    //   t.transform(-3.7037, 40.4168) → (440298.94, 4474257.31)
    #[test]
    fn madrid_wgs84_to_utm30n() {
        let (e, n) = wgs84_to_utm(-3.7037, 40.4168, 30, true);
        assert_close(e, 440_298.94, 1.0, "easting");
        assert_close(n, 4_474_257.31, 1.0, "northing");
    }

    // Guayaquil sits in UTM 17S (EPSG:32717)
    #[test]
    fn guayaquil_wgs84_to_utm17s() {
        let (e, n) = wgs84_to_utm(-79.8891, -2.1894, 17, false);
        assert_close(e, 623_533.49, 1.0, "easting");
        assert_close(n, 9_757_958.58, 1.0, "northing");
    }

    // Equator at zone 30 central meridian (-3°): easting should be 500000
    #[test]
    fn equator_central_meridian() {
        let (e, n) = wgs84_to_utm(-3.0, 0.0, 30, true);
        assert_close(e, 500_000.0, 0.01, "easting at CM");
        assert_close(n, 0.0, 0.01, "northing at equator");
    }

    #[test]
    fn roundtrip_wgs84_utm_wgs84() {
        for &(lon, lat, zone, north) in &[
            (-79.8891_f64, -2.1894_f64, 17_u32, false),
            (-3.7037, 40.4168, 30, true),
            (-58.3816, -34.6037, 21, false),
        ] {
            let (e, n) = wgs84_to_utm(lon, lat, zone, north);
            let (lon2, lat2) = utm_to_wgs84(e, n, zone, north);
            assert_close(lon2, lon, 1e-8, "roundtrip lon");
            assert_close(lat2, lat, 1e-8, "roundtrip lat");
        }
    }

    #[test]
    fn transform_identity() {
        let t = Transform::new(Crs::wgs84(), Crs::wgs84()).unwrap();
        let p = t.point(Point::new(-79.9, -2.2));
        assert_close(p.x(), -79.9, f64::EPSILON, "x");
        assert_close(p.y(), -2.2, f64::EPSILON, "y");
    }

    #[test]
    fn transform_unsupported_pair() {
        // Web Mercator is not handled
        assert!(Transform::new(Crs::wgs84(), Crs::from_epsg(3857)).is_err());
        // UTM → UTM across zones is not handled either
        assert!(Transform::new(Crs::from_epsg(32717), Crs::from_epsg(32718)).is_err());
    }

    #[test]
    fn transform_polygon_to_utm() {
        // ~1km square near Guayaquil, expected UTM area within a few percent
        let poly = polygon![
            (x: -79.90, y: -2.20),
            (x: -79.89, y: -2.20),
            (x: -79.89, y: -2.19),
            (x: -79.90, y: -2.19),
            (x: -79.90, y: -2.20),
        ];
        let t = Transform::new(Crs::wgs84(), Crs::from_epsg(32717)).unwrap();
        let projected = t.geometry(&Geometry::Polygon(poly));
        if let Geometry::Polygon(p) = projected {
            let xs: Vec<f64> = p.exterior().coords().map(|c| c.x).collect();
            let width = xs.iter().cloned().fold(f64::MIN, f64::max)
                - xs.iter().cloned().fold(f64::MAX, f64::min);
            // 0.01° lon at the equator ≈ 1113 m
            assert!(width > 1_000.0 && width < 1_250.0, "width ~1.1km, got {width}");
        } else {
            panic!("expected polygon");
        }
    }
}
