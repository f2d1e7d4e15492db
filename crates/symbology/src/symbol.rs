//! Fill, line and marker symbols.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Polygon fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStyle {
    Solid,
    /// Dot-density hatch, 1 (sparse) ..= 7 (dense)
    Dense(u8),
    NoFill,
}

/// Polygon fill symbol with outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSymbol {
    pub fill: Option<Rgb>,
    pub outline: Option<Rgb>,
    pub outline_width_mm: f64,
    pub style: FillStyle,
    /// Symbol opacity [0.0, 1.0]
    pub opacity: f64,
}

impl FillSymbol {
    /// Solid fill with outline, the common case
    pub fn simple(fill: Rgb, outline: Rgb, outline_width_mm: f64) -> Self {
        Self {
            fill: Some(fill),
            outline: Some(outline),
            outline_width_mm,
            style: FillStyle::Solid,
            opacity: 1.0,
        }
    }

    /// Outline-only frame, transparent interior
    pub fn outline_only(outline: Rgb, outline_width_mm: f64) -> Self {
        Self {
            fill: None,
            outline: Some(outline),
            outline_width_mm,
            style: FillStyle::NoFill,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_style(mut self, style: FillStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for FillSymbol {
    fn default() -> Self {
        Self::simple(Rgb::new(0x0D, 0x6E, 0xFD), Rgb::BLACK, 0.26)
    }
}

/// Line symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    pub color: Rgb,
    pub width_mm: f64,
    pub opacity: f64,
}

impl LineSymbol {
    pub fn new(color: Rgb, width_mm: f64) -> Self {
        Self {
            color,
            width_mm,
            opacity: 1.0,
        }
    }
}

impl Default for LineSymbol {
    fn default() -> Self {
        Self::new(Rgb::BLACK, 0.26)
    }
}

/// Marker shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Star,
    DiamondStar,
}

/// One layer of a (possibly stacked) marker symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayer {
    pub shape: MarkerShape,
    pub size_mm: f64,
    pub color: Rgb,
    /// Rotation in degrees, clockwise
    pub angle_deg: f64,
}

impl MarkerLayer {
    pub fn new(shape: MarkerShape, size_mm: f64, color: Rgb) -> Self {
        Self {
            shape,
            size_mm,
            color,
            angle_deg: 0.0,
        }
    }

    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle_deg = angle_deg;
        self
    }
}

/// Point marker symbol, drawn bottom layer first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerSymbol {
    pub layers: Vec<MarkerLayer>,
}

impl MarkerSymbol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-layer marker
    pub fn single(shape: MarkerShape, size_mm: f64, color: Rgb) -> Self {
        Self {
            layers: vec![MarkerLayer::new(shape, size_mm, color)],
        }
    }

    pub fn push_layer(&mut self, layer: MarkerLayer) {
        self.layers.push(layer);
    }
}

/// Any symbol a renderer can assign to a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Fill(FillSymbol),
    Line(LineSymbol),
    Marker(MarkerSymbol),
}

impl From<FillSymbol> for Symbol {
    fn from(s: FillSymbol) -> Self {
        Self::Fill(s)
    }
}

impl From<LineSymbol> for Symbol {
    fn from(s: LineSymbol) -> Self {
        Self::Line(s)
    }
}

impl From<MarkerSymbol> for Symbol {
    fn from(s: MarkerSymbol) -> Self {
        Self::Marker(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fill() {
        let s = FillSymbol::simple(Rgb::from_hex("#DBAA00").unwrap(), Rgb::BLACK, 0.95);
        assert_eq!(s.fill, Some(Rgb::new(0xDB, 0xAA, 0x00)));
        assert_eq!(s.style, FillStyle::Solid);
        assert!((s.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_opacity_clamped() {
        let s = FillSymbol::default().with_opacity(1.4);
        assert!((s.opacity - 1.0).abs() < f64::EPSILON);
        let s = FillSymbol::default().with_opacity(-0.1);
        assert!(s.opacity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_stacked_marker() {
        // Two diamond stars, the lower one rotated 45°
        let mut m = MarkerSymbol::new();
        let gold = Rgb::from_hex("#DBAA00").unwrap();
        m.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 4.4, gold).with_angle(45.0));
        m.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 5.5, gold));
        assert_eq!(m.layers.len(), 2);
        assert!((m.layers[0].angle_deg - 45.0).abs() < f64::EPSILON);
        assert!((m.layers[1].angle_deg).abs() < f64::EPSILON);
    }
}
