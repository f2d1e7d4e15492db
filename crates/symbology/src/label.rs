//! Label settings for vector layers.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Font specification for labels and layout text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: f64,
    pub bold: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_pt: f64) -> Self {
        Self {
            family: family.into(),
            size_pt,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Noto Sans", 8.5)
    }
}

/// Label placement relative to the feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placement {
    #[default]
    Horizontal,
    Curved,
}

/// Quadrant offset for horizontal placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quadrant {
    AboveLeft,
    Above,
    AboveRight,
    Left,
    #[default]
    Over,
    Right,
    BelowLeft,
    Below,
    BelowRight,
}

/// Labeling configuration for a vector layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Attribute field supplying the label text
    pub field: String,
    pub font: FontSpec,
    pub color: Rgb,
    pub placement: Placement,
    pub quadrant: Quadrant,
    pub enabled: bool,
}

impl LabelSettings {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            font: FontSpec::default(),
            color: Rgb::BLACK,
            placement: Placement::Horizontal,
            quadrant: Quadrant::Over,
            enabled: true,
        }
    }
}
