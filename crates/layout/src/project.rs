//! Map project: the registry of styled layers.
//!
//! Adding a layer replaces any existing layer with the same name, so
//! re-running a workflow against a live project swaps its layers in place.

pub mod basemaps;

use cartopress_core::{Crs, Feature, FeatureCollection};
use cartopress_symbology::{FillSymbol, FilterExpr, LabelSettings, Renderer};
use geo_types::Rect;

/// A styled vector layer
#[derive(Debug, Clone)]
pub struct VectorLayer {
    pub name: String,
    pub crs: Crs,
    pub features: FeatureCollection,
    pub renderer: Renderer,
    pub labels: Option<LabelSettings>,
    /// Layer opacity [0.0, 1.0], multiplied into symbol opacity
    pub opacity: f64,
    /// Subset filter: only matching features are drawn
    pub filter: Option<FilterExpr>,
}

impl VectorLayer {
    pub fn new(name: impl Into<String>, features: FeatureCollection) -> Self {
        Self {
            name: name.into(),
            crs: Crs::wgs84(),
            features,
            renderer: Renderer::single(FillSymbol::default()),
            labels: None,
            opacity: 1.0,
            filter: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_labels(mut self, labels: LabelSettings) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Restrict drawing to features matching the filter
    pub fn set_filter(&mut self, filter: Option<FilterExpr>) {
        self.filter = filter;
    }

    /// Features that pass the subset filter, in order
    pub fn visible_features(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| self.filter.as_ref().is_none_or(|expr| expr.matches(f)))
    }

    /// Bounding rectangle over the visible features
    pub fn extent(&self) -> Option<Rect<f64>> {
        let mut rect: Option<Rect<f64>> = None;
        for f in self.visible_features() {
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

/// An XYZ tile source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    /// URL template with {z}/{x}/{y} (or {q} quadkey) placeholders
    pub url_template: String,
    pub zmin: u8,
    pub zmax: u8,
}

impl TileSource {
    /// Source with the default zoom range
    pub fn xyz(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            zmin: 0,
            zmax: 19,
        }
    }

    /// The `type=xyz&url=…&zmin=…&zmax=…` connection-string form
    pub fn connection_string(&self) -> String {
        format!(
            "type=xyz&url={}&zmin={}&zmax={}",
            self.url_template, self.zmin, self.zmax
        )
    }
}

/// A basemap tile layer.
///
/// Tile layers are catalogued sources: the exporter draws them as a flat
/// backdrop and the workflow adds the attribution text, it never fetches
/// tiles.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub source: TileSource,
    pub attribution: Option<String>,
    pub opacity: f64,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, source: TileSource) -> Self {
        Self {
            name: name.into(),
            source,
            attribution: None,
            opacity: 1.0,
        }
    }
}

/// Any layer a project can hold
#[derive(Debug, Clone)]
pub enum Layer {
    Vector(VectorLayer),
    Tile(TileLayer),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Self::Vector(l) => &l.name,
            Self::Tile(l) => &l.name,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorLayer> {
        match self {
            Self::Vector(l) => Some(l),
            Self::Tile(_) => None,
        }
    }

    pub fn as_tile(&self) -> Option<&TileLayer> {
        match self {
            Self::Tile(l) => Some(l),
            Self::Vector(_) => None,
        }
    }
}

/// The layer registry
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub crs: Crs,
    layers: Vec<Layer>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer, replacing any existing layer with the same name
    pub fn add_layer(&mut self, layer: Layer) {
        self.remove_layer(layer.name());
        self.layers.push(layer);
    }

    /// Remove a layer by name. Returns true if a layer was removed.
    pub fn remove_layer(&mut self, name: &str) -> bool {
        if let Some(pos) = self.layers.iter().position(|l| l.name() == name) {
            self.layers.remove(pos);
            true
        } else {
            false
        }
    }

    /// Get a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Get a mutable layer by name
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    /// Get a vector layer by name
    pub fn vector_layer(&self, name: &str) -> Option<&VectorLayer> {
        self.layer(name).and_then(Layer::as_vector)
    }

    /// Layers in registration order
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartopress_core::AttributeValue;
    use geo_types::{point, Geometry};

    fn collection(names: &[&str]) -> FeatureCollection {
        let mut fc = FeatureCollection::new();
        for (i, n) in names.iter().enumerate() {
            let mut f = Feature::new(Geometry::Point(point! { x: i as f64, y: 0.0 }));
            f.set_property("name", AttributeValue::from(*n));
            fc.push(f);
        }
        fc
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut p = Project::new();
        p.add_layer(Layer::Vector(VectorLayer::new("Districts", collection(&["a"]))));
        p.add_layer(Layer::Vector(VectorLayer::new("Districts", collection(&["b", "c"]))));
        assert_eq!(p.len(), 1);
        assert_eq!(p.vector_layer("Districts").unwrap().features.len(), 2);
    }

    #[test]
    fn test_remove_layer() {
        let mut p = Project::new();
        p.add_layer(Layer::Vector(VectorLayer::new("Marker", collection(&["m"]))));
        assert!(p.remove_layer("Marker"));
        assert!(!p.remove_layer("Marker"));
        assert!(p.is_empty());
    }

    #[test]
    fn test_subset_filter() {
        let mut layer = VectorLayer::new("Malls", collection(&["Riocentro", "San Marino"]));
        layer.set_filter(Some(FilterExpr::eq("name", "San Marino")));
        let visible: Vec<_> = layer.visible_features().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].string_property("name"), Some("San Marino"));

        layer.set_filter(None);
        assert_eq!(layer.visible_features().count(), 2);
    }

    #[test]
    fn test_layer_order_preserved() {
        let mut p = Project::new();
        p.add_layer(Layer::Tile(TileLayer::new(
            "OpenStreetMap",
            TileSource::xyz("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
        )));
        p.add_layer(Layer::Vector(VectorLayer::new("Districts", collection(&["a"]))));
        let names: Vec<_> = p.layers().map(Layer::name).collect();
        assert_eq!(names, vec!["OpenStreetMap", "Districts"]);
    }

    #[test]
    fn test_connection_string() {
        let s = TileSource::xyz("https://tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(
            s.connection_string(),
            "type=xyz&url=https://tile.openstreetmap.org/{z}/{x}/{y}.png&zmin=0&zmax=19"
        );
    }
}
