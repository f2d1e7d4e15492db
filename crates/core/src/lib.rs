//! # Cartopress Core
//!
//! Core types and I/O for the cartopress cartographic report toolkit.
//!
//! This crate provides:
//! - `Feature` / `FeatureCollection`: vector data model over geo-types
//! - `Crs`: Coordinate Reference System handling with WGS84 ↔ UTM transforms
//! - GeoJSON reading into the feature model
//! - The shared `Error` / `Result` types

pub mod crs;
pub mod error;
pub mod io;
pub mod vector;

pub use crs::{Crs, Transform};
pub use error::{Error, Result};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{Crs, Transform};
    pub use crate::error::{Error, Result};
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
}
