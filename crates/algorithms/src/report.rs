//! Feature report assembly: area, centroids and the containing district.
//!
//! Given a focus feature (a mall, a parcel) and a layer of administrative
//! districts, builds the numbers the print layout shows: metric area in a
//! UTM zone, the centroid in both UTM and decimal degrees, and the
//! attributes of whichever district contains the feature.

use geo::Contains;
use geo_types::Point;

use cartopress_core::{Crs, Error, Feature, FeatureCollection, Result, Transform};

use crate::measurements;

/// Options controlling report assembly
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Projected CRS for the area computation. Derived from the feature
    /// centroid when `None`.
    pub utm_crs: Option<Crs>,
    /// District attributes copied into the report, in order
    pub district_fields: Vec<String>,
}

/// Attributes of the district containing the focus feature
#[derive(Debug, Clone)]
pub struct DistrictInfo {
    pub name: String,
    /// (field, value) pairs for the requested district fields
    pub attributes: Vec<(String, String)>,
}

/// The computed report for one focus feature
#[derive(Debug, Clone)]
pub struct FeatureReport {
    pub name: String,
    /// Area in square metres, measured in `utm_crs`
    pub area_m2: f64,
    pub utm_crs: Crs,
    /// Centroid in UTM easting/northing (metres)
    pub centroid_utm: Point<f64>,
    /// Centroid in WGS84 longitude/latitude (degrees)
    pub centroid_wgs84: Point<f64>,
    /// Containing district, if any
    pub district: Option<DistrictInfo>,
}

/// Find the first district whose geometry contains the feature
pub fn containing_district<'a>(
    feature: &Feature,
    districts: &'a FeatureCollection,
) -> Result<Option<&'a Feature>> {
    let geom = feature.require_geometry()?;
    Ok(districts.iter().find(|d| {
        d.geometry
            .as_ref()
            .is_some_and(|district_geom| district_geom.contains(geom))
    }))
}

/// Build the report for a focus feature.
///
/// All input geometry is expected in WGS84. The feature is transformed into
/// the (derived or given) UTM zone for the metric area and centroid, and the
/// centroid is transformed back to degrees for display, mirroring the
/// round trip the original workflow performs.
pub fn feature_report(
    feature: &Feature,
    name_field: &str,
    districts: &FeatureCollection,
    district_field: &str,
    options: &ReportOptions,
) -> Result<FeatureReport> {
    let geom = feature.require_geometry()?;
    let rough_centroid = measurements::centroid(geom)
        .ok_or_else(|| Error::Algorithm("feature geometry has no centroid".into()))?;

    let utm_crs = options
        .utm_crs
        .unwrap_or_else(|| Crs::utm_for(rough_centroid.x(), rough_centroid.y()));

    let to_utm = Transform::new(Crs::wgs84(), utm_crs)?;
    let to_wgs84 = Transform::new(utm_crs, Crs::wgs84())?;

    let projected = to_utm.geometry(geom);
    let area_m2 = measurements::area(&projected);
    let centroid_utm = measurements::centroid(&projected)
        .ok_or_else(|| Error::Algorithm("projected geometry has no centroid".into()))?;
    let centroid_wgs84 = to_wgs84.point(centroid_utm);

    let name = feature
        .string_property(name_field)
        .unwrap_or("Unknown")
        .to_string();

    let district = containing_district(feature, districts)?.map(|d| DistrictInfo {
        name: d
            .string_property(district_field)
            .unwrap_or("Unknown")
            .to_string(),
        attributes: options
            .district_fields
            .iter()
            .map(|field| {
                let value = d
                    .get_property(field)
                    .map(|v| v.as_text())
                    .unwrap_or_else(|| "Unknown".to_string());
                (field.clone(), value)
            })
            .collect(),
    });

    Ok(FeatureReport {
        name,
        area_m2,
        utm_crs,
        centroid_utm,
        centroid_wgs84,
        district,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartopress_core::AttributeValue;
    use geo_types::{polygon, Geometry};

    fn mall() -> Feature {
        // ~220m x 220m square near Guayaquil
        let mut f = Feature::new(Geometry::Polygon(polygon![
            (x: -79.891, y: -2.190),
            (x: -79.889, y: -2.190),
            (x: -79.889, y: -2.188),
            (x: -79.891, y: -2.188),
            (x: -79.891, y: -2.190),
        ]));
        f.set_property("name", AttributeValue::from("Mall del Sol"));
        f
    }

    fn districts() -> FeatureCollection {
        let mut tarqui = Feature::new(Geometry::Polygon(polygon![
            (x: -79.95, y: -2.25),
            (x: -79.85, y: -2.25),
            (x: -79.85, y: -2.15),
            (x: -79.95, y: -2.15),
            (x: -79.95, y: -2.25),
        ]));
        tarqui.set_property("district", AttributeValue::from("Tarqui"));
        tarqui.set_property("province", AttributeValue::from("Guayas"));

        let mut ximena = Feature::new(Geometry::Polygon(polygon![
            (x: -79.95, y: -2.35),
            (x: -79.85, y: -2.35),
            (x: -79.85, y: -2.25),
            (x: -79.95, y: -2.25),
            (x: -79.95, y: -2.35),
        ]));
        ximena.set_property("district", AttributeValue::from("Ximena"));

        let mut fc = FeatureCollection::new();
        fc.push(tarqui);
        fc.push(ximena);
        fc
    }

    #[test]
    fn test_report_basics() {
        let report = feature_report(
            &mall(),
            "name",
            &districts(),
            "district",
            &ReportOptions {
                utm_crs: None,
                district_fields: vec!["province".into(), "pop".into()],
            },
        )
        .unwrap();

        assert_eq!(report.name, "Mall del Sol");
        // Zone derived from the centroid: 17 south
        assert_eq!(report.utm_crs.epsg(), 32717);

        // 0.002° square at the equator ≈ 221m x 221m ≈ 49,000 m²
        assert!(
            report.area_m2 > 45_000.0 && report.area_m2 < 53_000.0,
            "area ~49k m², got {}",
            report.area_m2
        );

        // UTM centroid is in metres, WGS84 centroid back in degrees
        assert!(report.centroid_utm.x() > 100_000.0);
        assert!((report.centroid_wgs84.x() + 79.890).abs() < 1e-6);
        assert!((report.centroid_wgs84.y() + 2.189).abs() < 1e-6);

        let district = report.district.unwrap();
        assert_eq!(district.name, "Tarqui");
        assert_eq!(
            district.attributes,
            vec![
                ("province".to_string(), "Guayas".to_string()),
                ("pop".to_string(), "Unknown".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_fixed_utm_zone() {
        let report = feature_report(
            &mall(),
            "name",
            &districts(),
            "district",
            &ReportOptions {
                utm_crs: Some(Crs::from_epsg(32717)),
                district_fields: vec![],
            },
        )
        .unwrap();
        assert_eq!(report.utm_crs.epsg(), 32717);
    }

    #[test]
    fn test_report_no_containing_district() {
        // A feature outside every district polygon
        let mut far = Feature::new(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0), (x: 0.001, y: 0.0), (x: 0.001, y: 0.001), (x: 0.0, y: 0.0),
        ]));
        far.set_property("name", AttributeValue::from("Elsewhere"));

        let report =
            feature_report(&far, "name", &districts(), "district", &ReportOptions::default())
                .unwrap();
        assert!(report.district.is_none());
    }

    #[test]
    fn test_report_missing_geometry() {
        let f = Feature::empty();
        let err = feature_report(&f, "name", &districts(), "district", &ReportOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingGeometry));
    }

    #[test]
    fn test_containing_district_lookup() {
        let d = districts();
        let hit = containing_district(&mall(), &d).unwrap().unwrap();
        assert_eq!(hit.string_property("district"), Some("Tarqui"));
    }
}
