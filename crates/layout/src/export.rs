//! Layout export to SVG.
//!
//! Walks the layout items in order and emits one SVG document, one user unit
//! per millimetre. Map frames draw their project layers through each layer's
//! renderer; tile layers become a flat backdrop (tiles are never fetched).
//! Output is deterministic for identical inputs.

use std::path::Path;

use geo_types::{Geometry, LineString, Point, Polygon, Rect};
use svg::node::element::path::Data;
use svg::node::element::{
    Circle, ClipPath, Definitions, Group, Image, Line, Path as SvgPath, Rectangle, Text,
};
use svg::Document;

use cartopress_core::{Error, Feature, Result};
use cartopress_symbology::{
    FillStyle, FillSymbol, LabelSettings, LineSymbol, MarkerLayer, MarkerShape, MarkerSymbol,
    Quadrant, Rgb, Symbol,
};

use crate::items::{
    Graticule, HAlign, InfoTable, Label, Layout, LayoutItem, MapFrame, PageFrame, Picture,
    ScaleBar, VAlign,
};
use crate::project::{Layer, Project, VectorLayer};
use crate::units::LayoutRect;

/// Points-to-millimetres factor for font sizes
const PT_TO_MM: f64 = 0.352_778;

/// Kilometres per degree of longitude at the equator
const KM_PER_DEGREE: f64 = 111.320;

/// Backdrop tint standing in for unfetched basemap tiles
const TILE_BACKDROP: Rgb = Rgb::new(0xEA, 0xE8, 0xE4);

/// Upper bound on graticule lines per frame; beyond this the interval is
/// clearly wrong for the extent and the export fails instead of degrading
const MAX_GRATICULE_LINES: usize = 2_000;

/// Export a layout over a project as an SVG document
pub fn export_svg(layout: &Layout, project: &Project) -> Result<Document> {
    let page = layout.page;
    let mut doc = Document::new()
        .set("width", format!("{}mm", page.width_mm))
        .set("height", format!("{}mm", page.height_mm))
        .set("viewBox", (0.0, 0.0, page.width_mm, page.height_mm));

    // Page background
    doc = doc.add(
        Rectangle::new()
            .set("x", 0.0)
            .set("y", 0.0)
            .set("width", page.width_mm)
            .set("height", page.height_mm)
            .set("fill", "#FFFFFF"),
    );

    // One clip path per map frame keeps layer geometry inside its rectangle
    let mut defs = Definitions::new();
    for item in &layout.items {
        if let LayoutItem::Map(map) = item {
            defs = defs.add(
                ClipPath::new().set("id", format!("clip-{}", map.id)).add(
                    Rectangle::new()
                        .set("x", map.rect.origin.x_mm)
                        .set("y", map.rect.origin.y_mm)
                        .set("width", map.rect.size.width_mm)
                        .set("height", map.rect.size.height_mm),
                ),
            );
        }
    }
    doc = doc.add(defs);

    for item in &layout.items {
        doc = match item {
            LayoutItem::Map(map) => doc.add(render_map(map, project)?),
            LayoutItem::Label(label) => doc.add(render_label(label)),
            LayoutItem::ScaleBar(bar) => doc.add(render_scale_bar(bar, layout)?),
            LayoutItem::Picture(picture) => doc.add(render_picture(picture)),
            LayoutItem::InfoTable(table) => doc.add(render_info_table(table)),
            LayoutItem::PageFrame(frame) => doc.add(render_page_frame(frame, &layout.page)),
        };
    }

    Ok(doc)
}

/// Export a layout and write it to a file
pub fn write_svg<P: AsRef<Path>>(layout: &Layout, project: &Project, path: P) -> Result<()> {
    let doc = export_svg(layout, project)?;
    svg::save(path, &doc)?;
    Ok(())
}

// ─── Geographic-to-page mapping ─────────────────────────────────────────

/// Linear mapping from an extent in degrees to a page rectangle in mm
#[derive(Debug, Clone, Copy)]
struct Mapper {
    rect: LayoutRect,
    extent: Rect<f64>,
}

impl Mapper {
    fn new(rect: LayoutRect, extent: Rect<f64>) -> Result<Self> {
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Err(Error::Layout("map frame extent has zero size".into()));
        }
        Ok(Self { rect, extent })
    }

    fn to_mm(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = (x - self.extent.min().x) / self.extent.width();
        let fy = (self.extent.max().y - y) / self.extent.height();
        (
            self.rect.origin.x_mm + fx * self.rect.size.width_mm,
            self.rect.origin.y_mm + fy * self.rect.size.height_mm,
        )
    }
}

// ─── Map frames ─────────────────────────────────────────────────────────

fn render_map(map: &MapFrame, project: &Project) -> Result<Group> {
    let mapper = Mapper::new(map.rect, map.extent)?;

    let mut content = Group::new().set("clip-path", format!("url(#clip-{})", map.id));

    // Frame background
    content = content.add(
        Rectangle::new()
            .set("x", map.rect.origin.x_mm)
            .set("y", map.rect.origin.y_mm)
            .set("width", map.rect.size.width_mm)
            .set("height", map.rect.size.height_mm)
            .set("fill", map.background.to_hex()),
    );

    for name in &map.layers {
        let layer = project
            .layer(name)
            .ok_or_else(|| Error::LayerNotFound(name.clone()))?;
        match layer {
            Layer::Tile(tile) => {
                // Tiles are not fetched; stand in with a flat backdrop
                content = content.add(
                    Rectangle::new()
                        .set("x", map.rect.origin.x_mm)
                        .set("y", map.rect.origin.y_mm)
                        .set("width", map.rect.size.width_mm)
                        .set("height", map.rect.size.height_mm)
                        .set("fill", TILE_BACKDROP.to_hex())
                        .set("fill-opacity", tile.opacity),
                );
            }
            Layer::Vector(vector) => {
                content = render_vector_layer(content, vector, &mapper)?;
            }
        }
    }

    if let Some(graticule) = &map.graticule {
        content = render_graticule(content, graticule, map, &mapper)?;
    }

    let mut group = Group::new().add(content);

    if let Some(frame) = &map.frame {
        group = group.add(
            Rectangle::new()
                .set("x", map.rect.origin.x_mm)
                .set("y", map.rect.origin.y_mm)
                .set("width", map.rect.size.width_mm)
                .set("height", map.rect.size.height_mm)
                .set("fill", "none")
                .set("stroke", frame.color.to_hex())
                .set("stroke-width", frame.width_mm),
        );
    }

    Ok(group)
}

fn render_vector_layer(mut group: Group, layer: &VectorLayer, mapper: &Mapper) -> Result<Group> {
    for feature in layer.visible_features() {
        let Some(geometry) = &feature.geometry else { continue };
        let Some(symbol) = layer.renderer.symbol_for(feature) else { continue };
        group = render_geometry(group, geometry, symbol, layer.opacity, mapper);
    }

    if let Some(labels) = &layer.labels {
        if labels.enabled {
            for feature in layer.visible_features() {
                group = render_feature_label(group, feature, labels, mapper);
            }
        }
    }

    Ok(group)
}

fn render_geometry(
    group: Group,
    geometry: &Geometry<f64>,
    symbol: &Symbol,
    layer_opacity: f64,
    mapper: &Mapper,
) -> Group {
    match (geometry, symbol) {
        (Geometry::Polygon(p), Symbol::Fill(fill)) => {
            group.add(fill_path(polygon_data(p, mapper), fill, layer_opacity))
        }
        (Geometry::MultiPolygon(mp), Symbol::Fill(fill)) => {
            let mut data = Data::new();
            for p in &mp.0 {
                data = append_polygon(data, p, mapper);
            }
            group.add(fill_path(data, fill, layer_opacity))
        }
        (Geometry::LineString(ls), Symbol::Line(line)) => {
            group.add(stroke_path(line_data(ls, mapper), line, layer_opacity))
        }
        (Geometry::MultiLineString(mls), Symbol::Line(line)) => {
            let mut data = Data::new();
            for ls in &mls.0 {
                data = append_line(data, ls, mapper);
            }
            group.add(stroke_path(data, line, layer_opacity))
        }
        (Geometry::Point(p), Symbol::Marker(marker)) => {
            render_marker(group, *p, marker, layer_opacity, mapper)
        }
        (Geometry::MultiPoint(mp), Symbol::Marker(marker)) => {
            let mut group = group;
            for p in &mp.0 {
                group = render_marker(group, *p, marker, layer_opacity, mapper);
            }
            group
        }
        // Symbol type does not apply to this geometry: draw nothing
        _ => group,
    }
}

fn fill_path(data: Data, fill: &FillSymbol, layer_opacity: f64) -> SvgPath {
    let opacity = fill.opacity * layer_opacity;
    let mut path = SvgPath::new().set("d", data).set("fill-rule", "evenodd");

    path = match (fill.style, fill.fill) {
        (FillStyle::NoFill, _) | (_, None) => path.set("fill", "none"),
        (FillStyle::Solid, Some(color)) => path
            .set("fill", color.to_hex())
            .set("fill-opacity", opacity),
        // Dot-density hatches approximated by thinning the fill
        (FillStyle::Dense(level), Some(color)) => path
            .set("fill", color.to_hex())
            .set("fill-opacity", opacity * f64::from(level.min(7)) / 7.0),
    };

    match fill.outline {
        Some(outline) => path
            .set("stroke", outline.to_hex())
            .set("stroke-width", fill.outline_width_mm)
            .set("stroke-opacity", layer_opacity),
        None => path.set("stroke", "none"),
    }
}

fn stroke_path(data: Data, line: &LineSymbol, layer_opacity: f64) -> SvgPath {
    SvgPath::new()
        .set("d", data)
        .set("fill", "none")
        .set("stroke", line.color.to_hex())
        .set("stroke-width", line.width_mm)
        .set("stroke-opacity", line.opacity * layer_opacity)
}

fn polygon_data(polygon: &Polygon<f64>, mapper: &Mapper) -> Data {
    append_polygon(Data::new(), polygon, mapper)
}

fn append_polygon(mut data: Data, polygon: &Polygon<f64>, mapper: &Mapper) -> Data {
    data = append_ring(data, polygon.exterior(), mapper);
    for interior in polygon.interiors() {
        data = append_ring(data, interior, mapper);
    }
    data
}

fn append_ring(mut data: Data, ring: &LineString<f64>, mapper: &Mapper) -> Data {
    let mut coords = ring.coords();
    let Some(first) = coords.next() else { return data };
    let (x, y) = mapper.to_mm(first.x, first.y);
    data = data.move_to((x, y));
    for c in coords {
        let (x, y) = mapper.to_mm(c.x, c.y);
        data = data.line_to((x, y));
    }
    data.close()
}

fn line_data(ls: &LineString<f64>, mapper: &Mapper) -> Data {
    append_line(Data::new(), ls, mapper)
}

fn append_line(mut data: Data, ls: &LineString<f64>, mapper: &Mapper) -> Data {
    let mut coords = ls.coords();
    let Some(first) = coords.next() else { return data };
    let (x, y) = mapper.to_mm(first.x, first.y);
    data = data.move_to((x, y));
    for c in coords {
        let (x, y) = mapper.to_mm(c.x, c.y);
        data = data.line_to((x, y));
    }
    data
}

// ─── Markers ────────────────────────────────────────────────────────────

fn render_marker(
    mut group: Group,
    point: Point<f64>,
    marker: &MarkerSymbol,
    layer_opacity: f64,
    mapper: &Mapper,
) -> Group {
    let (cx, cy) = mapper.to_mm(point.x(), point.y());
    for layer in &marker.layers {
        let r = layer.size_mm / 2.0;
        if layer.shape == MarkerShape::Circle {
            group = group.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", r)
                    .set("fill", layer.color.to_hex())
                    .set("fill-opacity", layer_opacity)
                    .set("stroke", "none"),
            );
        } else {
            group = group.add(marker_path(cx, cy, layer, layer_opacity));
        }
    }
    group
}

fn marker_path(cx: f64, cy: f64, layer: &MarkerLayer, layer_opacity: f64) -> SvgPath {
    let r = layer.size_mm / 2.0;
    let vertices: Vec<(f64, f64)> = match layer.shape {
        // Circle is handled by the caller
        MarkerShape::Circle | MarkerShape::Square => radial_vertices(4, r, r, 45.0, layer.angle_deg),
        MarkerShape::Triangle => radial_vertices(3, r, r, 0.0, layer.angle_deg),
        MarkerShape::Star => radial_vertices(5, r, r * 0.45, 0.0, layer.angle_deg),
        MarkerShape::DiamondStar => radial_vertices(4, r, r * 0.35, 0.0, layer.angle_deg),
    };

    let mut data = Data::new();
    for (i, (dx, dy)) in vertices.iter().enumerate() {
        let p = (cx + dx, cy + dy);
        data = if i == 0 { data.move_to(p) } else { data.line_to(p) };
    }
    SvgPath::new()
        .set("d", data.close())
        .set("fill", layer.color.to_hex())
        .set("fill-opacity", layer_opacity)
        .set("stroke", "none")
}

/// Vertices of a star-like shape: `points` outer vertices at radius
/// `outer_r` interleaved with inner vertices at `inner_r`, starting upward.
/// For `inner_r == outer_r` this degenerates to a regular polygon.
fn radial_vertices(
    points: usize,
    outer_r: f64,
    inner_r: f64,
    phase_deg: f64,
    angle_deg: f64,
) -> Vec<(f64, f64)> {
    let start = (-90.0 + phase_deg + angle_deg).to_radians();
    let step = std::f64::consts::PI / points as f64;
    let regular = (inner_r - outer_r).abs() < f64::EPSILON;

    let count = if regular { points } else { points * 2 };
    (0..count)
        .map(|i| {
            let radius = if regular || i % 2 == 0 { outer_r } else { inner_r };
            let angle = if regular {
                start + 2.0 * step * i as f64
            } else {
                start + step * i as f64
            };
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

// ─── Graticule ──────────────────────────────────────────────────────────

fn render_graticule(
    mut group: Group,
    graticule: &Graticule,
    map: &MapFrame,
    mapper: &Mapper,
) -> Result<Group> {
    let ext = map.extent;
    if graticule.interval_x_deg <= 0.0 || graticule.interval_y_deg <= 0.0 {
        return Err(Error::Layout("graticule interval must be positive".into()));
    }

    let nx = (ext.width() / graticule.interval_x_deg) as usize;
    let ny = (ext.height() / graticule.interval_y_deg) as usize;
    if nx + ny > MAX_GRATICULE_LINES {
        return Err(Error::Layout(format!(
            "graticule interval too small for extent: {} lines",
            nx + ny
        )));
    }

    let stroke = graticule.line.color.to_hex();
    let width = graticule.line.width_mm;
    let label_size = 2.2; // mm
    let label_color = Rgb::GRAY.to_hex();

    // Vertical lines at multiples of the x interval
    let mut lon = (ext.min().x / graticule.interval_x_deg).ceil() * graticule.interval_x_deg;
    while lon <= ext.max().x {
        let (x, _) = mapper.to_mm(lon, ext.min().y);
        group = group.add(
            Line::new()
                .set("x1", x)
                .set("y1", map.rect.origin.y_mm)
                .set("x2", x)
                .set("y2", map.rect.bottom())
                .set("stroke", stroke.clone())
                .set("stroke-width", width),
        );
        if graticule.show_coordinates {
            group = group.add(
                Text::new(format!("{lon:.4}"))
                    .set("x", x + 0.5)
                    .set("y", map.rect.bottom() - 1.0)
                    .set("font-size", label_size)
                    .set("font-family", "Arial")
                    .set("fill", label_color.clone()),
            );
        }
        lon += graticule.interval_x_deg;
    }

    // Horizontal lines at multiples of the y interval
    let mut lat = (ext.min().y / graticule.interval_y_deg).ceil() * graticule.interval_y_deg;
    while lat <= ext.max().y {
        let (_, y) = mapper.to_mm(ext.min().x, lat);
        group = group.add(
            Line::new()
                .set("x1", map.rect.origin.x_mm)
                .set("y1", y)
                .set("x2", map.rect.right())
                .set("y2", y)
                .set("stroke", stroke.clone())
                .set("stroke-width", width),
        );
        if graticule.show_coordinates {
            group = group.add(
                Text::new(format!("{lat:.4}"))
                    .set("x", map.rect.origin.x_mm + 0.5)
                    .set("y", y - 0.5)
                    .set("font-size", label_size)
                    .set("font-family", "Arial")
                    .set("fill", label_color.clone()),
            );
        }
        lat += graticule.interval_y_deg;
    }

    Ok(group)
}

// ─── Feature labels ─────────────────────────────────────────────────────

fn render_feature_label(
    group: Group,
    feature: &Feature,
    labels: &LabelSettings,
    mapper: &Mapper,
) -> Group {
    use geo::Centroid;

    let Some(text) = feature.get_property(&labels.field).map(|v| v.as_text()) else {
        return group;
    };
    if text.is_empty() {
        return group;
    }
    let Some(centroid) = feature.geometry.as_ref().and_then(|g| g.centroid()) else {
        return group;
    };

    let (x, y) = mapper.to_mm(centroid.x(), centroid.y());
    let (dx, dy, anchor) = quadrant_offset(labels.quadrant);

    let mut node = Text::new(text)
        .set("x", x + dx)
        .set("y", y + dy)
        .set("font-size", labels.font.size_pt * PT_TO_MM)
        .set("font-family", labels.font.family.clone())
        .set("fill", labels.color.to_hex())
        .set("text-anchor", anchor);
    if labels.font.bold {
        node = node.set("font-weight", "bold");
    }
    group.add(node)
}

fn quadrant_offset(quadrant: Quadrant) -> (f64, f64, &'static str) {
    match quadrant {
        Quadrant::AboveLeft => (-1.0, -1.0, "end"),
        Quadrant::Above => (0.0, -1.0, "middle"),
        Quadrant::AboveRight => (1.0, -1.0, "start"),
        Quadrant::Left => (-1.0, 0.0, "end"),
        Quadrant::Over => (0.0, 0.0, "middle"),
        Quadrant::Right => (1.0, 0.0, "start"),
        Quadrant::BelowLeft => (-1.0, 1.0, "end"),
        Quadrant::Below => (0.0, 1.0, "middle"),
        Quadrant::BelowRight => (1.0, 1.0, "start"),
    }
}

// ─── Page items ─────────────────────────────────────────────────────────

fn render_label(label: &Label) -> Group {
    let mut group = Group::new();

    if let Some(frame) = &label.frame {
        group = group.add(
            Rectangle::new()
                .set("x", label.position.x_mm)
                .set("y", label.position.y_mm)
                .set("width", label.size.width_mm)
                .set("height", label.size.height_mm)
                .set("fill", "none")
                .set("stroke", frame.color.to_hex())
                .set("stroke-width", frame.width_mm),
        );
    }

    let font_mm = label.font.size_pt * PT_TO_MM;
    let (x, anchor) = match label.halign {
        HAlign::Left => (label.position.x_mm + 1.0, "start"),
        HAlign::Center => (label.position.x_mm + label.size.width_mm / 2.0, "middle"),
        HAlign::Right => (label.position.x_mm + label.size.width_mm - 1.0, "end"),
    };
    let y = match label.valign {
        VAlign::Top => label.position.y_mm + font_mm,
        VAlign::Middle => label.position.y_mm + label.size.height_mm / 2.0 + font_mm / 2.0,
        VAlign::Bottom => label.position.y_mm + label.size.height_mm - 1.0,
    };

    let mut node = Text::new(label.text.clone())
        .set("x", x)
        .set("y", y)
        .set("font-size", font_mm)
        .set("font-family", label.font.family.clone())
        .set("fill", label.color.to_hex())
        .set("text-anchor", anchor);
    if label.font.bold {
        node = node.set("font-weight", "bold");
    }

    group.add(node)
}

fn render_scale_bar(bar: &ScaleBar, layout: &Layout) -> Result<Group> {
    let map = layout
        .map_frame(&bar.linked_map)
        .ok_or_else(|| Error::Layout(format!("scale bar links unknown map '{}'", bar.linked_map)))?;

    // Ground kilometres spanned by the frame at its centre latitude
    let center_lat = map.extent.center().y.to_radians();
    let km_per_deg = KM_PER_DEGREE * center_lat.cos();
    let extent_km = map.extent.width() * km_per_deg;
    if extent_km <= 0.0 {
        return Err(Error::Layout("scale bar needs a non-degenerate map extent".into()));
    }
    let mm_per_km = map.rect.size.width_mm / extent_km;
    let segment_mm = bar.km_per_segment * mm_per_km;
    let total_mm = segment_mm * f64::from(bar.segments);

    let mut group = Group::new();

    if let Some(background) = bar.background {
        group = group.add(
            Rectangle::new()
                .set("x", bar.position.x_mm)
                .set("y", bar.position.y_mm)
                .set("width", bar.size.width_mm)
                .set("height", bar.size.height_mm)
                .set("fill", background.to_hex()),
        );
    }

    let baseline_y = bar.position.y_mm + bar.size.height_mm * 0.65;
    let x0 = bar.position.x_mm + 2.0;
    let font_mm = bar.font.size_pt * PT_TO_MM;

    // Baseline with ticks up at every segment boundary
    group = group.add(
        Line::new()
            .set("x1", x0)
            .set("y1", baseline_y)
            .set("x2", x0 + total_mm)
            .set("y2", baseline_y)
            .set("stroke", "#000000")
            .set("stroke-width", 0.3),
    );
    for i in 0..=bar.segments {
        let x = x0 + segment_mm * f64::from(i);
        group = group.add(
            Line::new()
                .set("x1", x)
                .set("y1", baseline_y)
                .set("x2", x)
                .set("y2", baseline_y - bar.height_mm)
                .set("stroke", "#000000")
                .set("stroke-width", 0.3),
        );

        let km = bar.km_per_segment * f64::from(i);
        let text = if i == bar.segments {
            format!("{km} km")
        } else {
            format!("{km}")
        };
        group = group.add(
            Text::new(text)
                .set("x", x)
                .set("y", baseline_y - bar.height_mm - 0.8)
                .set("font-size", font_mm)
                .set("font-family", bar.font.family.clone())
                .set("fill", "#000000")
                .set("text-anchor", "middle"),
        );
    }

    Ok(group)
}

fn render_picture(picture: &Picture) -> Group {
    let mut group = Group::new().add(
        Image::new()
            .set("href", picture.path.clone())
            .set("x", picture.position.x_mm)
            .set("y", picture.position.y_mm)
            .set("width", picture.size.width_mm)
            .set("height", picture.size.height_mm),
    );

    if let Some(frame) = &picture.frame {
        group = group.add(
            Rectangle::new()
                .set("x", picture.position.x_mm)
                .set("y", picture.position.y_mm)
                .set("width", picture.size.width_mm)
                .set("height", picture.size.height_mm)
                .set("fill", "none")
                .set("stroke", frame.color.to_hex())
                .set("stroke-width", frame.width_mm),
        );
    }

    group
}

fn render_info_table(table: &InfoTable) -> Group {
    let row_count = table.rows.len() + 1; // header included
    let row_h = table.size.height_mm / row_count as f64;
    let x = table.position.x_mm;
    let w = table.size.width_mm;
    let key_w = w * 0.4;
    let font_mm = table.font.size_pt * PT_TO_MM;

    let mut group = Group::new();

    // Header background and zebra striping
    group = group.add(
        Rectangle::new()
            .set("x", x)
            .set("y", table.position.y_mm)
            .set("width", w)
            .set("height", row_h)
            .set("fill", "#F2F2F2"),
    );
    for (i, _) in table.rows.iter().enumerate() {
        if i % 2 == 1 {
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", table.position.y_mm + row_h * (i + 1) as f64)
                    .set("width", w)
                    .set("height", row_h)
                    .set("fill", "#F9F9F9"),
            );
        }
    }

    // Cell text
    let cell_text = |content: String, cx: f64, cy: f64, bold: bool| {
        let mut node = Text::new(content)
            .set("x", cx)
            .set("y", cy)
            .set("font-size", font_mm)
            .set("font-family", table.font.family.clone())
            .set("fill", "#000000");
        if bold {
            node = node.set("font-weight", "bold");
        }
        node
    };

    let text_y = |row: usize| table.position.y_mm + row_h * row as f64 + row_h / 2.0 + font_mm / 2.5;

    group = group.add(cell_text(table.header.0.clone(), x + 1.5, text_y(0), true));
    group = group.add(cell_text(table.header.1.clone(), x + key_w + 1.5, text_y(0), true));
    for (i, (key, value)) in table.rows.iter().enumerate() {
        group = group.add(cell_text(key.clone(), x + 1.5, text_y(i + 1), false));
        group = group.add(cell_text(value.clone(), x + key_w + 1.5, text_y(i + 1), false));
    }

    // Ruling: outer border, row separators, column separator
    group = group.add(
        Rectangle::new()
            .set("x", x)
            .set("y", table.position.y_mm)
            .set("width", w)
            .set("height", row_h * row_count as f64)
            .set("fill", "none")
            .set("stroke", "#DDDDDD")
            .set("stroke-width", 0.2),
    );
    for i in 1..row_count {
        let y = table.position.y_mm + row_h * i as f64;
        group = group.add(
            Line::new()
                .set("x1", x)
                .set("y1", y)
                .set("x2", x + w)
                .set("y2", y)
                .set("stroke", "#DDDDDD")
                .set("stroke-width", 0.2),
        );
    }
    group = group.add(
        Line::new()
            .set("x1", x + key_w)
            .set("y1", table.position.y_mm)
            .set("x2", x + key_w)
            .set("y2", table.position.y_mm + row_h * row_count as f64)
            .set("stroke", "#DDDDDD")
            .set("stroke-width", 0.2),
    );

    group
}

fn render_page_frame(frame: &PageFrame, page: &crate::items::Page) -> Rectangle {
    Rectangle::new()
        .set("x", frame.margin_mm)
        .set("y", frame.margin_mm)
        .set("width", page.width_mm - 2.0 * frame.margin_mm)
        .set("height", page.height_mm - 2.0 * frame.margin_mm)
        .set("fill", "none")
        .set("stroke", "#000000")
        .set("stroke-width", frame.outline_width_mm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{FrameStyle, Page};
    use crate::project::{TileLayer, TileSource, VectorLayer};
    use cartopress_core::{AttributeValue, FeatureCollection};
    use cartopress_symbology::{FilterExpr, FontSpec, LabelSettings, Renderer, Rule};
    use geo_types::{coord, point, polygon};

    fn extent() -> Rect<f64> {
        Rect::new(coord! { x: -80.0, y: -2.3 }, coord! { x: -79.8, y: -2.1 })
    }

    fn district_project() -> Project {
        let mut tarqui = Feature::new(Geometry::Polygon(polygon![
            (x: -79.95, y: -2.25), (x: -79.85, y: -2.25), (x: -79.85, y: -2.15),
            (x: -79.95, y: -2.15), (x: -79.95, y: -2.25),
        ]));
        tarqui.set_property("district", AttributeValue::from("Tarqui"));

        let mut marker = Feature::new(Geometry::Point(point! { x: -79.89, y: -2.19 }));
        marker.set_property("kind", AttributeValue::from("centroid"));

        let mut districts = FeatureCollection::new();
        districts.push(tarqui);
        let mut markers = FeatureCollection::new();
        markers.push(marker);

        let gold = Rgb::from_hex("#DBAA00").unwrap();
        let mut marker_symbol = MarkerSymbol::new();
        marker_symbol.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 4.4, gold).with_angle(45.0));
        marker_symbol.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 5.5, gold));

        let mut project = Project::new();
        project.add_layer(Layer::Tile(TileLayer::new(
            "OpenStreetMap",
            TileSource::xyz("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
        )));
        project.add_layer(Layer::Vector(
            VectorLayer::new("Districts", districts)
                .with_renderer(Renderer::rule_based(vec![Rule::new(
                    Some(FilterExpr::eq("district", "Tarqui")),
                    FillSymbol::simple(Rgb::from_hex("#006AFF").unwrap(), Rgb::WHITE, 1.25)
                        .with_opacity(0.45),
                )]))
                .with_labels(LabelSettings::new("district")),
        ));
        project.add_layer(Layer::Vector(
            VectorLayer::new("Marker", markers)
                .with_renderer(Renderer::single(marker_symbol)),
        ));
        project
    }

    fn district_layout() -> Layout {
        let mut layout = Layout::new("District_Layout");
        layout.page = Page::a4_landscape();
        layout.add_item(
            MapFrame::new("district-map", LayoutRect::new(8.7, 17.0, 211.5, 173.0), extent())
                .with_layers(vec![
                    "OpenStreetMap".into(),
                    "Districts".into(),
                    "Marker".into(),
                ])
                .with_graticule(Graticule::new(0.0011, 0.0011)),
        );
        layout.add_item(
            Label::new("LÍMITES DISTRITALES", FontSpec::new("Montserrat", 18.0).bold())
                .at(228.8, 17.0)
                .sized(61.2, 173.0)
                .centered()
                .framed(FrameStyle::new(Rgb::BLACK, 0.25)),
        );
        layout.add_item(ScaleBar::new("district-map", 2.5, 2).at(175.9, 28.1));
        layout.add_item(PageFrame::default());
        layout
    }

    #[test]
    fn test_export_produces_svg() {
        let doc = export_svg(&district_layout(), &district_project()).unwrap();
        let text = doc.to_string();
        assert!(text.contains("<svg"));
        assert!(text.contains("viewBox"));
        assert!(text.contains("LÍMITES DISTRITALES"));
        assert!(text.contains("Tarqui"));
        // Map frame clip path present
        assert!(text.contains("clip-district-map"));
        // Graticule lines drawn
        assert!(text.contains("stroke-width"));
        // Scale bar end label
        assert!(text.contains("5 km"));
    }

    #[test]
    fn test_export_deterministic() {
        let a = export_svg(&district_layout(), &district_project()).unwrap().to_string();
        let b = export_svg(&district_layout(), &district_project()).unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_layer_fails() {
        let mut layout = Layout::new("broken");
        layout.add_item(
            MapFrame::new("m", LayoutRect::new(0.0, 0.0, 100.0, 100.0), extent())
                .with_layers(vec!["NoSuchLayer".into()]),
        );
        let err = export_svg(&layout, &Project::new()).unwrap_err();
        assert!(matches!(err, Error::LayerNotFound(_)));
    }

    #[test]
    fn test_scale_bar_unknown_map_fails() {
        let mut layout = Layout::new("broken");
        layout.add_item(ScaleBar::new("ghost-map", 1.0, 2));
        let err = export_svg(&layout, &Project::new()).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_graticule_too_dense_fails() {
        let mut layout = Layout::new("dense");
        layout.add_item(
            MapFrame::new("m", LayoutRect::new(0.0, 0.0, 100.0, 100.0), extent())
                .with_graticule(Graticule::new(1e-7, 1e-7)),
        );
        let err = export_svg(&layout, &district_project()).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_subset_filter_hides_features() {
        let mut project = district_project();
        if let Some(Layer::Vector(layer)) = project.layer_mut("Districts") {
            layer.set_filter(Some(FilterExpr::eq("district", "Nowhere")));
        }
        let text = export_svg(&district_layout(), &project).unwrap().to_string();
        assert!(!text.contains("Tarqui"));
    }

    #[test]
    fn test_info_table_rendered() {
        let mut table = InfoTable::new(("Centro Comercial".into(), "Mall del Sol".into()));
        table.push_row("Área", "48972 m²");
        let mut layout = Layout::new("table-only");
        layout.add_item(table);
        let text = export_svg(&layout, &Project::new()).unwrap().to_string();
        assert!(text.contains("Centro Comercial"));
        assert!(text.contains("48972 m²"));
    }
}
