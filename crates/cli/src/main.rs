//! Cartopress CLI - cartographic report generation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use cartopress_algorithms::graticule::estimate_interval;
use cartopress_algorithms::report::{feature_report, FeatureReport, ReportOptions};
use cartopress_core::io::read_geojson;
use cartopress_core::{Crs, Feature, FeatureCollection};
use cartopress_layout::project::basemaps;
use cartopress_layout::{
    write_svg, FrameStyle, Graticule, InfoTable, Label, Layer, Layout, LayoutManager, LayoutPoint,
    LayoutRect, LayoutSize, MapFrame, PageFrame, Picture, Project, ScaleBar, TileSource,
    VectorLayer,
};
use cartopress_symbology::{
    FillStyle, FillSymbol, FilterExpr, FontSpec, LabelSettings, MarkerLayer, MarkerShape,
    MarkerSymbol, Quadrant, Renderer, Rgb, Rule,
};
use geo_types::Geometry;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cartopress")]
#[command(author, version, about = "Cartographic report generation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a vector file
    Info {
        /// Input GeoJSON file
        input: PathBuf,
    },
    /// List the built-in basemap sources
    Sources,
    /// Estimate the graticule interval for a polygon area
    Graticule {
        /// Polygon area in square metres
        area_m2: f64,
    },
    /// Compute and print the report for a selected feature
    Inspect {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Compose and export the full report layout
    Report {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output SVG file
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the info table as a standalone HTML file
        #[arg(long)]
        html_table: Option<PathBuf>,

        /// Report title (rendered uppercase)
        #[arg(long, default_value = "District Boundaries")]
        title: String,

        /// Footer text
        #[arg(long, default_value = "© 2025 Hit the Code Labs. All Rights Reserved.")]
        footer: String,

        /// Basemap drawn under the vector layers (see `sources`)
        #[arg(long, default_value = "OpenStreetMap")]
        basemap: String,

        /// Zoom-out factor applied to the districts extent
        #[arg(long, default_value = "1.85")]
        zoom: f64,

        /// Kilometres per scale-bar segment
        #[arg(long, default_value = "2.5")]
        scale_km: f64,

        /// Logo image placed in the bottom-right corner
        #[arg(long)]
        logo: Option<PathBuf>,

        /// North-arrow image placed over the map
        #[arg(long)]
        north_arrow: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SelectionArgs {
    /// Districts GeoJSON file
    #[arg(long)]
    districts: PathBuf,

    /// Sites GeoJSON file (malls, parcels, ...)
    #[arg(long)]
    sites: PathBuf,

    /// Select the site by this attribute value
    #[arg(long, conflicts_with = "index")]
    name: Option<String>,

    /// Select the site by position (1-based)
    #[arg(long)]
    index: Option<usize>,

    /// Attribute naming the sites
    #[arg(long, default_value = "Name")]
    name_field: String,

    /// Attribute naming the districts
    #[arg(long, default_value = "DENOMINACI")]
    district_field: String,

    /// District attributes copied into the report
    #[arg(long, value_delimiter = ',', default_value = "PROV,CANTON,PARROQUIA")]
    district_fields: Vec<String>,

    /// Projected CRS for area computation, e.g. EPSG:32717.
    /// Derived from the site centroid when omitted.
    #[arg(long)]
    utm_zone: Option<String>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_layer(path: &PathBuf) -> Result<FeatureCollection> {
    let pb = spinner("Reading vector data...");
    let fc = read_geojson(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("{}: {} features", path.display(), fc.len());
    Ok(fc)
}

fn select_site<'a>(
    sites: &'a FeatureCollection,
    selection: &SelectionArgs,
) -> Result<&'a Feature> {
    if let Some(name) = &selection.name {
        return sites
            .find_by_attribute(&selection.name_field, name)
            .with_context(|| format!("No site with {} = '{}'", selection.name_field, name));
    }
    if let Some(index) = selection.index {
        if index == 0 || index > sites.len() {
            anyhow::bail!("Site index {} out of range 1..={}", index, sites.len());
        }
        return Ok(&sites.features[index - 1]);
    }
    anyhow::bail!("Select a site with --name or --index");
}

fn parse_utm(selection: &SelectionArgs) -> Result<Option<Crs>> {
    selection
        .utm_zone
        .as_deref()
        .map(|s| Crs::parse(s).context("Invalid --utm-zone"))
        .transpose()
}

fn build_report(selection: &SelectionArgs) -> Result<(FeatureCollection, FeatureCollection, FeatureReport)> {
    let districts = read_layer(&selection.districts)?;
    let sites = read_layer(&selection.sites)?;

    let site = select_site(&sites, selection)?;
    debug!(
        "Selected site: {}",
        site.string_property(&selection.name_field).unwrap_or("Unknown")
    );

    let report = feature_report(
        site,
        &selection.name_field,
        &districts,
        &selection.district_field,
        &ReportOptions {
            utm_crs: parse_utm(selection)?,
            district_fields: selection.district_fields.clone(),
        },
    )
    .context("Failed to compute feature report")?;

    Ok((districts, sites, report))
}

fn print_report(report: &FeatureReport) {
    println!("Site: {}", report.name);
    match &report.district {
        Some(district) => {
            println!("District: {}", district.name);
            for (field, value) in &district.attributes {
                println!("  {}: {}", field, value);
            }
        }
        None => println!("District: not found"),
    }
    println!("Area: {:.2} m²", report.area_m2);
    println!(
        "Centroid ({}): ({:.3}, {:.3})",
        report.utm_crs,
        report.centroid_utm.x(),
        report.centroid_utm.y()
    );
    println!(
        "Centroid (decimal degrees): ({:.6}, {:.6})",
        report.centroid_wgs84.y(),
        report.centroid_wgs84.x()
    );
}

/// The gold stacked diamond-star marker used for site centroids
fn centroid_marker() -> MarkerSymbol {
    let gold = Rgb::new(0xDB, 0xAA, 0x00);
    let mut symbol = MarkerSymbol::new();
    symbol.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 4.4, gold).with_angle(45.0));
    symbol.push_layer(MarkerLayer::new(MarkerShape::DiamondStar, 5.5, gold));
    symbol
}

/// Rule-based renderer highlighting the selected district over the rest
fn district_renderer(district_field: &str, selected: Option<&str>) -> Renderer {
    let blue = Rgb::new(0x00, 0x6A, 0xFF);
    let highlighted = FillSymbol::simple(blue, Rgb::WHITE, 1.25).with_opacity(0.45);
    let muted = FillSymbol::simple(blue, Rgb::WHITE, 1.25).with_opacity(0.40);

    match selected {
        Some(name) => Renderer::rule_based(vec![
            Rule::new(Some(FilterExpr::eq(district_field, name)), highlighted),
            Rule::new(Some(FilterExpr::ne(district_field, name)), muted),
        ]),
        None => Renderer::single(muted),
    }
}

fn info_table(report: &FeatureReport) -> InfoTable {
    let mut table = InfoTable::new(("Site".to_string(), report.name.clone()));
    if let Some(district) = &report.district {
        table.push_row("District", district.name.clone());
        for (field, value) in &district.attributes {
            table.push_row(field.clone(), value.clone());
        }
    }
    table.push_row("Area", format!("{:.2} m²", report.area_m2));
    table.push_row(
        "Centroid (lat, lon)",
        format!(
            "{:.6}, {:.6}",
            report.centroid_wgs84.y(),
            report.centroid_wgs84.x()
        ),
    );
    table.push_row(
        format!("Centroid ({})", report.utm_crs),
        format!(
            "{:.3}, {:.3}",
            report.centroid_utm.x(),
            report.centroid_utm.y()
        ),
    );
    table
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let fc = read_layer(&input)?;
            println!("File: {}", input.display());
            println!("Features: {}", fc.len());

            let mut kinds: Vec<(&'static str, usize)> = Vec::new();
            for f in fc.iter() {
                let kind = match &f.geometry {
                    Some(Geometry::Point(_)) => "Point",
                    Some(Geometry::MultiPoint(_)) => "MultiPoint",
                    Some(Geometry::LineString(_)) => "LineString",
                    Some(Geometry::MultiLineString(_)) => "MultiLineString",
                    Some(Geometry::Polygon(_)) => "Polygon",
                    Some(Geometry::MultiPolygon(_)) => "MultiPolygon",
                    Some(_) => "Other",
                    None => "None",
                };
                match kinds.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, count)) => *count += 1,
                    None => kinds.push((kind, 1)),
                }
            }
            for (kind, count) in kinds {
                println!("  {}: {}", kind, count);
            }

            if let Some(rect) = fc.bounding_rect() {
                println!(
                    "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    rect.min().x,
                    rect.min().y,
                    rect.max().x,
                    rect.max().y
                );
            }
        }

        // ── Sources ──────────────────────────────────────────────────
        Commands::Sources => {
            println!("Registered basemap sources:");
            for basemap in basemaps::BASEMAPS {
                println!("{}", basemap.name);
                println!("  {}", TileSource::xyz(basemap.url).connection_string());
            }
        }

        // ── Graticule ────────────────────────────────────────────────
        Commands::Graticule { area_m2 } => {
            let interval = estimate_interval(area_m2).context("Failed to estimate interval")?;
            println!(
                "Grid interval: {:.6}° x {:.6}°",
                interval.x_degrees, interval.y_degrees
            );
        }

        // ── Inspect ──────────────────────────────────────────────────
        Commands::Inspect { selection } => {
            let (_, _, report) = build_report(&selection)?;
            print_report(&report);

            let interval = estimate_interval(report.area_m2)
                .context("Failed to estimate graticule interval")?;
            println!(
                "Grid interval: {:.6}° x {:.6}°",
                interval.x_degrees, interval.y_degrees
            );
        }

        // ── Report ───────────────────────────────────────────────────
        Commands::Report {
            selection,
            out,
            html_table,
            title,
            footer,
            basemap,
            zoom,
            scale_km,
            logo,
            north_arrow,
        } => {
            let (districts, sites, report) = build_report(&selection)?;
            print_report(&report);

            let interval = estimate_interval(report.area_m2)
                .context("Failed to estimate graticule interval")?;
            info!(
                "Graticule interval: {:.6}° x {:.6}°",
                interval.x_degrees, interval.y_degrees
            );

            // ── Project: basemap + styled layers ─────────────────
            let mut project = Project::new();

            let tile = basemaps::lookup(&basemap)
                .with_context(|| format!("Unknown basemap '{}'; see `cartopress sources`", basemap))?
                .to_layer();
            let attribution = tile.attribution.clone();
            project.add_layer(Layer::Tile(tile));

            let mut district_labels = LabelSettings::new(selection.district_field.as_str());
            district_labels.font = FontSpec::new("Noto Sans", 8.5).bold();
            district_labels.quadrant = Quadrant::AboveLeft;

            let district_layer = VectorLayer::new("Districts", districts)
                .with_renderer(district_renderer(
                    &selection.district_field,
                    report.district.as_ref().map(|d| d.name.as_str()),
                ))
                .with_labels(district_labels);
            let extent = district_layer
                .extent()
                .context("Districts layer has no drawable features")?;
            project.add_layer(Layer::Vector(district_layer));

            let mut site_layer = VectorLayer::new("Sites", sites).with_renderer(
                Renderer::single(
                    FillSymbol::simple(Rgb::new(0xF0, 0xF4, 0xF7), Rgb::BLACK, 0.20)
                        .with_style(FillStyle::Dense(5)),
                ),
            );
            site_layer.set_filter(Some(FilterExpr::eq(
                selection.name_field.as_str(),
                report.name.as_str(),
            )));
            project.add_layer(Layer::Vector(site_layer));

            let mut marker_features = FeatureCollection::new();
            marker_features.push(Feature::new(Geometry::Point(report.centroid_wgs84)));
            project.add_layer(Layer::Vector(
                VectorLayer::new("Marker", marker_features)
                    .with_renderer(Renderer::single(centroid_marker())),
            ));

            // ── Layout composition ───────────────────────────────
            let mut layout = Layout::new("District_Layout");

            let mut map = MapFrame::new(
                "district-map",
                LayoutRect::new(8.719, 16.994, 211.496, 173.030),
                extent,
            )
            .with_layers(vec![
                basemap.clone(),
                "Districts".into(),
                "Sites".into(),
                "Marker".into(),
            ])
            .with_graticule(Graticule::new(interval.x_degrees, interval.y_degrees));
            map.scale_extent(zoom);
            layout.add_item(map);

            layout.add_item(
                Label::new(title.to_uppercase(), FontSpec::new("Montserrat", 18.0).bold())
                    .at(228.774, 16.994)
                    .sized(61.245, 173.030)
                    .centered()
                    .framed(FrameStyle::new(Rgb::BLACK, 0.25)),
            );

            if let Some(text) = attribution {
                layout.add_item(
                    Label::new(text, FontSpec::new("Lato", 7.0))
                        .at(185.233, 190.850)
                        .sized(40.107, 6.259)
                        .with_color(Rgb::GRAY),
                );
            }

            layout.add_item(
                Label::new(footer, FontSpec::new("Open Sans", 7.0))
                    .at(3.0, 204.289)
                    .sized(85.279, 6.455)
                    .with_color(Rgb::GRAY),
            );

            layout.add_item(ScaleBar::new("district-map", scale_km, 2).at(175.902, 28.080));

            if let Some(path) = logo {
                layout.add_item(Picture::new(
                    path.display().to_string(),
                    LayoutPoint::new(241.670, 191.149),
                    LayoutSize::new(54.569, 16.695),
                ));
            }

            if let Some(path) = north_arrow {
                let mut picture = Picture::new(
                    path.display().to_string(),
                    LayoutPoint::new(187.579, 163.226),
                    LayoutSize::new(25.120, 21.499),
                );
                picture.frame = Some(FrameStyle::new(Rgb::BLACK, 0.10));
                layout.add_item(picture);
            }

            let table = info_table(&report);
            if let Some(path) = &html_table {
                let html = cartopress_layout::html::info_table_html(&table);
                std::fs::write(path, html)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("HTML table saved to: {}", path.display());
            }
            layout.add_item(table);

            layout.add_item(PageFrame::default());

            let mut manager = LayoutManager::new();
            manager.add_layout(layout);
            let layout = manager
                .layout_by_name("District_Layout")
                .context("Layout missing from manager")?;

            let pb = spinner("Exporting layout...");
            write_svg(layout, &project, &out)
                .with_context(|| format!("Failed to export {}", out.display()))?;
            pb.finish_and_clear();

            println!("Report saved to: {}", out.display());
        }
    }

    Ok(())
}
