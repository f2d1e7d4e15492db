//! I/O for vector formats

mod geojson;

pub use geojson::{read_geojson, read_geojson_str};
