//! Layout measurements. Everything is millimetres on the page.

use serde::{Deserialize, Serialize};

/// A position on the page, from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x_mm: f64,
    pub y_mm: f64,
}

impl LayoutPoint {
    pub fn new(x_mm: f64, y_mm: f64) -> Self {
        Self { x_mm, y_mm }
    }
}

/// A size on the page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl LayoutSize {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// A placed rectangle on the page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub origin: LayoutPoint,
    pub size: LayoutSize,
}

impl LayoutRect {
    pub fn new(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            origin: LayoutPoint::new(x_mm, y_mm),
            size: LayoutSize::new(width_mm, height_mm),
        }
    }

    pub fn right(&self) -> f64 {
        self.origin.x_mm + self.size.width_mm
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y_mm + self.size.height_mm
    }

    pub fn center(&self) -> LayoutPoint {
        LayoutPoint::new(
            self.origin.x_mm + self.size.width_mm / 2.0,
            self.origin.y_mm + self.size.height_mm / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = LayoutRect::new(10.0, 20.0, 100.0, 50.0);
        assert!((r.right() - 110.0).abs() < 1e-12);
        assert!((r.bottom() - 70.0).abs() < 1e-12);
        let c = r.center();
        assert!((c.x_mm - 60.0).abs() < 1e-12);
        assert!((c.y_mm - 45.0).abs() < 1e-12);
    }
}
