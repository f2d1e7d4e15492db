//! # Cartopress Algorithms
//!
//! Analysis routines for the cartopress report workflow.
//!
//! ## Available categories
//!
//! - **graticule**: grid-line spacing estimation from polygon area
//! - **measurements**: area, perimeter, length, centroid
//! - **report**: feature report assembly (area, centroids, containing district)

pub mod graticule;
pub mod measurements;
pub mod report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::graticule::{estimate_interval, fit_power_law, GridInterval, PowerLawFit};
    pub use crate::measurements::{area, centroid, length, perimeter};
    pub use crate::report::{feature_report, FeatureReport, ReportOptions};
    pub use cartopress_core::prelude::*;
}
