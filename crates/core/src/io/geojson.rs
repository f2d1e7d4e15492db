//! GeoJSON reading (RFC 7946) into the feature model.
//!
//! Supports FeatureCollection, Feature and bare Geometry documents with
//! Point, MultiPoint, LineString, MultiLineString, Polygon and MultiPolygon
//! geometries. GeometryCollection is rejected as unsupported. Altitude in
//! positions is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo_types::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection {
        features: Vec<JsonFeatureBody>,
    },
    Feature(JsonFeatureBody),
    #[serde(untagged)]
    Geometry(JsonGeometry),
}

#[derive(Debug, Deserialize)]
struct JsonFeatureBody {
    geometry: Option<JsonGeometry>,
    #[serde(default)]
    properties: Option<HashMap<String, Value>>,
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Read a GeoJSON file into a FeatureCollection
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let file = File::open(path.as_ref())?;
    let doc: Document = serde_json::from_reader(BufReader::new(file))?;
    convert_document(doc)
}

/// Read GeoJSON from an in-memory string.
///
/// Same as [`read_geojson`] but operates on a string slice instead of a file
/// path. Useful for tests and embedded fixtures.
pub fn read_geojson_str(data: &str) -> Result<FeatureCollection> {
    let doc: Document = serde_json::from_str(data)?;
    convert_document(doc)
}

fn convert_document(doc: Document) -> Result<FeatureCollection> {
    let mut out = FeatureCollection::new();
    match doc {
        Document::FeatureCollection { features } => {
            for f in features {
                out.push(convert_feature(f)?);
            }
        }
        Document::Feature(body) => out.push(convert_feature(body)?),
        Document::Geometry(g) => out.push(Feature::new(convert_geometry(&g)?)),
    }
    Ok(out)
}

fn convert_feature(body: JsonFeatureBody) -> Result<Feature> {
    let mut feature = match body.geometry {
        Some(g) => Feature::new(convert_geometry(&g)?),
        None => Feature::empty(),
    };
    if let Some(props) = body.properties {
        for (k, v) in props {
            feature.set_property(k, convert_value(v));
        }
    }
    feature.id = body.id.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    });
    Ok(feature)
}

fn convert_value(v: Value) -> AttributeValue {
    match v {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Int(i)
            } else {
                AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => AttributeValue::String(s),
        // Nested arrays/objects are kept as their JSON text
        other => AttributeValue::String(other.to_string()),
    }
}

fn convert_geometry(g: &JsonGeometry) -> Result<Geometry<f64>> {
    match g.kind.as_str() {
        "Point" => Ok(Geometry::Point(Point(position(&g.coordinates)?))),
        "MultiPoint" => {
            let coords = positions(&g.coordinates)?;
            Ok(Geometry::MultiPoint(MultiPoint(
                coords.into_iter().map(Point).collect(),
            )))
        }
        "LineString" => Ok(Geometry::LineString(LineString(positions(&g.coordinates)?))),
        "MultiLineString" => {
            let lines = each(&g.coordinates)?
                .iter()
                .map(|l| positions(l).map(LineString))
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiLineString(MultiLineString(lines)))
        }
        "Polygon" => Ok(Geometry::Polygon(polygon(&g.coordinates)?)),
        "MultiPolygon" => {
            let polys = each(&g.coordinates)?
                .iter()
                .map(polygon)
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon(polys)))
        }
        other => Err(Error::UnsupportedGeometry(other.to_string())),
    }
}

fn polygon(rings_value: &Value) -> Result<Polygon<f64>> {
    let rings = each(rings_value)?
        .iter()
        .map(|r| positions(r).map(LineString))
        .collect::<Result<Vec<_>>>()?;
    let mut iter = rings.into_iter();
    let exterior = iter
        .next()
        .ok_or_else(|| Error::InvalidGeoJson("polygon with no rings".into()))?;
    Ok(Polygon::new(exterior, iter.collect()))
}

fn each(v: &Value) -> Result<&Vec<Value>> {
    v.as_array()
        .ok_or_else(|| Error::InvalidGeoJson("expected coordinate array".into()))
}

fn positions(v: &Value) -> Result<Vec<Coord<f64>>> {
    each(v)?.iter().map(position).collect()
}

fn position(v: &Value) -> Result<Coord<f64>> {
    let arr = each(v)?;
    if arr.len() < 2 {
        return Err(Error::InvalidGeoJson("position needs at least 2 numbers".into()));
    }
    let x = arr[0]
        .as_f64()
        .ok_or_else(|| Error::InvalidGeoJson("non-numeric coordinate".into()))?;
    let y = arr[1]
        .as_f64()
        .ok_or_else(|| Error::InvalidGeoJson("non-numeric coordinate".into()))?;
    Ok(Coord { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRICTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 7,
                "properties": {"district": "Tarqui", "province": "Guayas", "pop": 1050826},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-79.95, -2.25], [-79.85, -2.25], [-79.85, -2.15],
                        [-79.95, -2.15], [-79.95, -2.25]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {"district": "Ximena", "province": "Guayas", "pop": null},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[
                        [-79.95, -2.35], [-79.85, -2.35], [-79.85, -2.25],
                        [-79.95, -2.25], [-79.95, -2.35]
                    ]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_read_feature_collection() {
        let fc = read_geojson_str(DISTRICTS).unwrap();
        assert_eq!(fc.len(), 2);

        let tarqui = fc.find_by_attribute("district", "Tarqui").unwrap();
        assert_eq!(tarqui.string_property("province"), Some("Guayas"));
        assert_eq!(tarqui.float_property("pop"), Some(1_050_826.0));
        assert_eq!(tarqui.id.as_deref(), Some("7"));
        assert!(matches!(tarqui.geometry, Some(Geometry::Polygon(_))));

        let ximena = fc.find_by_attribute("district", "Ximena").unwrap();
        assert_eq!(ximena.get_property("pop"), Some(&AttributeValue::Null));
        assert!(matches!(ximena.geometry, Some(Geometry::MultiPolygon(_))));
    }

    #[test]
    fn test_read_bare_geometry() {
        let fc = read_geojson_str(
            r#"{"type": "Point", "coordinates": [-79.9, -2.2, 14.0]}"#,
        )
        .unwrap();
        assert_eq!(fc.len(), 1);
        match &fc.features[0].geometry {
            Some(Geometry::Point(p)) => {
                assert!((p.x() + 79.9).abs() < 1e-12);
                assert!((p.y() + 2.2).abs() < 1e-12);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_read_single_feature_document() {
        let fc = read_geojson_str(
            r#"{
                "type": "Feature",
                "properties": {"name": "marker"},
                "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}
            }"#,
        )
        .unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].string_property("name"), Some("marker"));
    }

    #[test]
    fn test_polygon_with_hole() {
        let fc = read_geojson_str(
            r#"{"type": "Polygon", "coordinates": [
                [[0,0],[10,0],[10,10],[0,10],[0,0]],
                [[2,2],[8,2],[8,8],[2,8],[2,2]]
            ]}"#,
        )
        .unwrap();
        match &fc.features[0].geometry {
            Some(Geometry::Polygon(p)) => assert_eq!(p.interiors().len(), 1),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_geometry_collection_rejected() {
        let err = read_geojson_str(
            r#"{"type": "Feature", "properties": {}, "geometry":
                {"type": "GeometryCollection", "geometries": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeometry(_)));
    }

    #[test]
    fn test_invalid_position_rejected() {
        let err = read_geojson_str(r#"{"type": "Point", "coordinates": [1.0]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidGeoJson(_)));
    }

    #[test]
    fn test_feature_without_geometry() {
        let fc = read_geojson_str(
            r#"{"type": "Feature", "properties": {"name": "tableonly"}, "geometry": null}"#,
        )
        .unwrap();
        assert!(fc.features[0].geometry.is_none());
    }
}
