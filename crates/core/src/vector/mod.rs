//! Vector data model: features with geometry and attributes

use geo::BoundingRect;
use geo_types::{Geometry, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// String form used for filter comparison and table output
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Get a string attribute, if present and a string
    pub fn string_property(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(AttributeValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get a numeric attribute, coercing ints to float
    pub fn float_property(&self, key: &str) -> Option<f64> {
        match self.properties.get(key) {
            Some(AttributeValue::Float(f)) => Some(*f),
            Some(AttributeValue::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// The feature's geometry, or `Error::MissingGeometry`
    pub fn require_geometry(&self) -> Result<&Geometry<f64>> {
        self.geometry.as_ref().ok_or(Error::MissingGeometry)
    }

    /// Bounding rectangle of the geometry, if any
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.as_ref().and_then(|g| g.bounding_rect())
    }
}

/// Collection of features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// First feature whose attribute `field` equals `value` (string comparison)
    pub fn find_by_attribute(&self, field: &str, value: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.get_property(field).is_some_and(|v| v.as_text() == value))
    }

    /// Bounding rectangle covering every feature geometry
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let mut rect: Option<Rect<f64>> = None;
        for f in &self.features {
            let Some(r) = f.bounding_rect() else { continue };
            rect = Some(match rect {
                None => r,
                Some(acc) => Rect::new(
                    geo_types::coord! {
                        x: acc.min().x.min(r.min().x),
                        y: acc.min().y.min(r.min().y),
                    },
                    geo_types::coord! {
                        x: acc.max().x.max(r.max().x),
                        y: acc.max().y.max(r.max().y),
                    },
                ),
            });
        }
        rect
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
