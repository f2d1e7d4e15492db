//! Catalogue of well-known XYZ basemap sources.

use super::{TileLayer, TileSource};

/// A catalogued basemap source
#[derive(Debug, Clone, Copy)]
pub struct Basemap {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: Option<&'static str>,
}

/// Built-in basemap sources
pub const BASEMAPS: &[Basemap] = &[
    Basemap {
        name: "OpenStreetMap",
        url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: Some("© OpenStreetMap contributors"),
    },
    Basemap {
        name: "OpenTopoMap",
        url: "https://tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution: Some("© OpenStreetMap contributors, SRTM | © OpenTopoMap"),
    },
    Basemap {
        name: "Bing Aerial",
        url: "http://ecn.t3.tiles.virtualearth.net/tiles/a{q}.jpeg?g=1",
        attribution: Some("© Microsoft"),
    },
    Basemap {
        name: "Google Maps",
        url: "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}",
        attribution: Some("© Google"),
    },
    Basemap {
        name: "Google Satellite",
        url: "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
        attribution: Some("© Google"),
    },
    Basemap {
        name: "Google Satellite Hybrid",
        url: "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}",
        attribution: Some("© Google"),
    },
    Basemap {
        name: "Google Terrain",
        url: "https://mt1.google.com/vt/lyrs=t&x={x}&y={y}&z={z}",
        attribution: Some("© Google"),
    },
    Basemap {
        name: "CartoDb Positron",
        url: "http://basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
        attribution: Some("© OpenStreetMap contributors, © CARTO"),
    },
    Basemap {
        name: "CartoDb Dark Matter",
        url: "http://basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
        attribution: Some("© OpenStreetMap contributors, © CARTO"),
    },
    Basemap {
        name: "Esri Satellite",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        attribution: Some("© Esri"),
    },
    Basemap {
        name: "Esri Standard",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: Some("© Esri"),
    },
    Basemap {
        name: "Esri Topo World",
        url: "http://services.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: Some("© Esri"),
    },
    Basemap {
        name: "Esri Hillshade",
        url: "http://services.arcgisonline.com/ArcGIS/rest/services/Elevation/World_Hillshade/MapServer/tile/{z}/{y}/{x}",
        attribution: Some("© Esri"),
    },
    Basemap {
        name: "Mapzen Global Terrain",
        url: "https://s3.amazonaws.com/elevation-tiles-prod/terrarium/{z}/{x}/{y}.png",
        attribution: Some("© Mapzen"),
    },
];

/// Look up a catalogued basemap by name (case-insensitive)
pub fn lookup(name: &str) -> Option<&'static Basemap> {
    BASEMAPS
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
}

impl Basemap {
    /// Build a tile layer from this catalogue entry
    pub fn to_layer(&self) -> TileLayer {
        let mut layer = TileLayer::new(self.name, TileSource::xyz(self.url));
        layer.attribution = self.attribution.map(str::to_string);
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert!(lookup("openstreetmap").is_some());
        assert!(lookup("OpenStreetMap").is_some());
        assert!(lookup("No Such Map").is_none());
    }

    #[test]
    fn test_to_layer() {
        let layer = lookup("OpenStreetMap").unwrap().to_layer();
        assert_eq!(layer.name, "OpenStreetMap");
        assert_eq!(
            layer.source.connection_string(),
            "type=xyz&url=https://tile.openstreetmap.org/{z}/{x}/{y}.png&zmin=0&zmax=19"
        );
        assert_eq!(
            layer.attribution.as_deref(),
            Some("© OpenStreetMap contributors")
        );
    }

    #[test]
    fn test_catalogue_names_unique() {
        let mut names: Vec<_> = BASEMAPS.iter().map(|b| b.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BASEMAPS.len());
    }
}
