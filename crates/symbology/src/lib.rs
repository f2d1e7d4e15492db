//! # Cartopress Symbology
//!
//! Colors, symbols, renderers and label settings for cartopress map styling.
//!
//! The model mirrors the styling surface a desktop GIS exposes: fill symbols
//! for polygon layers, stacked marker symbol layers for point layers, a
//! rule-based renderer that picks a symbol per feature from attribute
//! filters, and label settings bound to an attribute field.

mod color;
mod label;
mod renderer;
mod symbol;

pub use color::Rgb;
pub use label::{FontSpec, LabelSettings, Placement, Quadrant};
pub use renderer::{FilterExpr, FilterOp, Renderer, Rule};
pub use symbol::{FillStyle, FillSymbol, LineSymbol, MarkerLayer, MarkerShape, MarkerSymbol, Symbol};
