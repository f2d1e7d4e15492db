//! # Cartopress Layout
//!
//! Map project and print-layout composition for cartopress.
//!
//! A [`Project`] is the registry of styled map layers (the document being
//! mapped); a [`Layout`] is a page composition in millimetres — map frames,
//! labels, scale bars, pictures and info tables — that can be exported as an
//! SVG report. Both registries replace entries by name, so re-running a
//! workflow overwrites its previous products instead of accumulating copies.

pub mod export;
pub mod html;
pub mod items;
pub mod manager;
pub mod project;
pub mod units;

pub use export::{export_svg, write_svg};
pub use items::{
    FrameStyle, Graticule, HAlign, InfoTable, Label, Layout, LayoutItem, MapFrame, Page,
    PageFrame, Picture, ScaleBar, VAlign,
};
pub use manager::LayoutManager;
pub use project::{basemaps, Layer, Project, TileLayer, TileSource, VectorLayer};
pub use units::{LayoutPoint, LayoutRect, LayoutSize};
