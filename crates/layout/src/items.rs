//! Print-layout model: a page and the items placed on it.
//!
//! Positions and sizes are millimetres from the page's top-left corner.

use geo_types::{coord, Rect};

use cartopress_symbology::{FontSpec, LineSymbol, Rgb};

use crate::units::{LayoutPoint, LayoutRect, LayoutSize};

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Page {
    pub fn a4_landscape() -> Self {
        Self {
            width_mm: 297.0,
            height_mm: 210.0,
        }
    }

    pub fn a4_portrait() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::a4_landscape()
    }
}

/// Stroke style of an item frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub color: Rgb,
    pub width_mm: f64,
}

impl FrameStyle {
    pub fn new(color: Rgb, width_mm: f64) -> Self {
        Self { color, width_mm }
    }

    /// Thin black frame, the layout default
    pub fn thin() -> Self {
        Self::new(Rgb::BLACK, 0.25)
    }
}

/// Coordinate grid overlay for a map frame
#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    /// Spacing between vertical grid lines, degrees of longitude
    pub interval_x_deg: f64,
    /// Spacing between horizontal grid lines, degrees of latitude
    pub interval_y_deg: f64,
    pub line: LineSymbol,
    /// Draw coordinate annotations along the frame edges
    pub show_coordinates: bool,
}

impl Graticule {
    pub fn new(interval_x_deg: f64, interval_y_deg: f64) -> Self {
        Self {
            interval_x_deg,
            interval_y_deg,
            line: LineSymbol::new(Rgb::new(120, 120, 120), 0.1),
            show_coordinates: true,
        }
    }
}

/// A map view placed on the page
#[derive(Debug, Clone)]
pub struct MapFrame {
    /// Identifier other items (scale bars) link to
    pub id: String,
    pub rect: LayoutRect,
    /// Names of project layers drawn in this frame, bottom first
    pub layers: Vec<String>,
    /// Geographic extent shown (WGS84 degrees)
    pub extent: Rect<f64>,
    pub frame: Option<FrameStyle>,
    pub graticule: Option<Graticule>,
    pub background: Rgb,
}

impl MapFrame {
    pub fn new(id: impl Into<String>, rect: LayoutRect, extent: Rect<f64>) -> Self {
        Self {
            id: id.into(),
            rect,
            layers: Vec::new(),
            extent,
            frame: Some(FrameStyle::thin()),
            graticule: None,
            background: Rgb::WHITE,
        }
    }

    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_graticule(mut self, graticule: Graticule) -> Self {
        self.graticule = Some(graticule);
        self
    }

    /// Grow (or shrink) the extent about its centre, like zooming out on a
    /// layer extent before framing it
    pub fn scale_extent(&mut self, factor: f64) {
        let c = self.extent.center();
        let half_w = self.extent.width() * factor / 2.0;
        let half_h = self.extent.height() * factor / 2.0;
        self.extent = Rect::new(
            coord! { x: c.x - half_w, y: c.y - half_h },
            coord! { x: c.x + half_w, y: c.y + half_h },
        );
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A text label on the page
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub font: FontSpec,
    pub color: Rgb,
    pub position: LayoutPoint,
    pub size: LayoutSize,
    pub frame: Option<FrameStyle>,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Label {
    pub fn new(text: impl Into<String>, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            font,
            color: Rgb::BLACK,
            position: LayoutPoint::default(),
            size: LayoutSize::new(40.0, 8.0),
            frame: None,
            halign: HAlign::Left,
            valign: VAlign::Top,
        }
    }

    pub fn at(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.position = LayoutPoint::new(x_mm, y_mm);
        self
    }

    pub fn sized(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.size = LayoutSize::new(width_mm, height_mm);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.halign = HAlign::Center;
        self.valign = VAlign::Middle;
        self
    }

    pub fn framed(mut self, frame: FrameStyle) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// A ticks-up scale bar linked to a map frame
#[derive(Debug, Clone)]
pub struct ScaleBar {
    /// `MapFrame::id` this bar measures
    pub linked_map: String,
    pub position: LayoutPoint,
    pub size: LayoutSize,
    /// Kilometres represented by one segment
    pub km_per_segment: f64,
    pub segments: u32,
    /// Tick height above the baseline
    pub height_mm: f64,
    pub font: FontSpec,
    pub background: Option<Rgb>,
}

impl ScaleBar {
    pub fn new(linked_map: impl Into<String>, km_per_segment: f64, segments: u32) -> Self {
        Self {
            linked_map: linked_map.into(),
            position: LayoutPoint::default(),
            size: LayoutSize::new(34.4, 10.7),
            km_per_segment,
            segments,
            height_mm: 1.5,
            font: FontSpec::new("Arial", 8.0),
            background: Some(Rgb::WHITE),
        }
    }

    pub fn at(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.position = LayoutPoint::new(x_mm, y_mm);
        self
    }
}

/// An image placed on the page (logo, north arrow)
#[derive(Debug, Clone)]
pub struct Picture {
    /// Path or URL referenced from the exported document
    pub path: String,
    pub position: LayoutPoint,
    pub size: LayoutSize,
    pub frame: Option<FrameStyle>,
}

impl Picture {
    pub fn new(path: impl Into<String>, position: LayoutPoint, size: LayoutSize) -> Self {
        Self {
            path: path.into(),
            position,
            size,
            frame: None,
        }
    }
}

/// A key/value info table
#[derive(Debug, Clone)]
pub struct InfoTable {
    /// Header row: (label, value) rendered emphasized
    pub header: (String, String),
    pub rows: Vec<(String, String)>,
    pub position: LayoutPoint,
    pub size: LayoutSize,
    pub font: FontSpec,
}

impl InfoTable {
    pub fn new(header: (String, String)) -> Self {
        Self {
            header,
            rows: Vec::new(),
            position: LayoutPoint::new(13.875, 122.963),
            size: LayoutSize::new(103.283, 84.515),
            font: FontSpec::new("Arial", 7.0),
        }
    }

    pub fn push_row(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.rows.push((key.into(), value.into()));
    }

    pub fn at(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.position = LayoutPoint::new(x_mm, y_mm);
        self
    }

    pub fn sized(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.size = LayoutSize::new(width_mm, height_mm);
        self
    }
}

/// A rectangular frame around the whole page
#[derive(Debug, Clone, Copy)]
pub struct PageFrame {
    pub margin_mm: f64,
    pub outline_width_mm: f64,
}

impl Default for PageFrame {
    fn default() -> Self {
        Self {
            margin_mm: 1.0,
            outline_width_mm: 0.65,
        }
    }
}

/// Any item a layout can hold
#[derive(Debug, Clone)]
pub enum LayoutItem {
    Map(MapFrame),
    Label(Label),
    ScaleBar(ScaleBar),
    Picture(Picture),
    InfoTable(InfoTable),
    PageFrame(PageFrame),
}

/// A named page composition
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: String,
    pub page: Page,
    pub items: Vec<LayoutItem>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page: Page::default(),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: impl Into<LayoutItem>) {
        self.items.push(item.into());
    }

    /// The map frame with the given id, if any
    pub fn map_frame(&self, id: &str) -> Option<&MapFrame> {
        self.items.iter().find_map(|item| match item {
            LayoutItem::Map(m) if m.id == id => Some(m),
            _ => None,
        })
    }
}

impl From<MapFrame> for LayoutItem {
    fn from(v: MapFrame) -> Self {
        Self::Map(v)
    }
}

impl From<Label> for LayoutItem {
    fn from(v: Label) -> Self {
        Self::Label(v)
    }
}

impl From<ScaleBar> for LayoutItem {
    fn from(v: ScaleBar) -> Self {
        Self::ScaleBar(v)
    }
}

impl From<Picture> for LayoutItem {
    fn from(v: Picture) -> Self {
        Self::Picture(v)
    }
}

impl From<InfoTable> for LayoutItem {
    fn from(v: InfoTable) -> Self {
        Self::InfoTable(v)
    }
}

impl From<PageFrame> for LayoutItem {
    fn from(v: PageFrame) -> Self {
        Self::PageFrame(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> Rect<f64> {
        Rect::new(coord! { x: -80.0, y: -2.3 }, coord! { x: -79.8, y: -2.1 })
    }

    #[test]
    fn test_scale_extent_about_center() {
        let mut m = MapFrame::new("map", LayoutRect::new(10.0, 10.0, 100.0, 100.0), extent());
        m.scale_extent(1.85);

        let c = m.extent.center();
        assert!((c.x + 79.9).abs() < 1e-9);
        assert!((c.y + 2.2).abs() < 1e-9);
        assert!((m.extent.width() - 0.2 * 1.85).abs() < 1e-9);
        assert!((m.extent.height() - 0.2 * 1.85).abs() < 1e-9);
    }

    #[test]
    fn test_map_frame_lookup() {
        let mut layout = Layout::new("District_Layout");
        layout.add_item(MapFrame::new(
            "district-map",
            LayoutRect::new(8.7, 17.0, 211.5, 173.0),
            extent(),
        ));
        assert!(layout.map_frame("district-map").is_some());
        assert!(layout.map_frame("other").is_none());
    }

    #[test]
    fn test_page_defaults() {
        let p = Page::default();
        assert!((p.width_mm - 297.0).abs() < 1e-12);
        assert!((p.height_mm - 210.0).abs() < 1e-12);
    }
}
