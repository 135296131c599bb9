//! Interactive map document assembly.
//!
//! Markers and polylines are collected into a [`MapDocument`] and written out
//! as a single self-contained HTML page: a Leaflet map over OSM tiles with the
//! point data embedded as a JSON literal.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::{BusLine, Entity, Error, Result};

pub const DEFAULT_ZOOM: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

pub const STYLE_BUILDING: MarkerStyle = MarkerStyle {
    icon: "building",
    color: "blue",
};
pub const STYLE_TRANSPORT: MarkerStyle = MarkerStyle {
    icon: "flag",
    color: "green",
};
pub const STYLE_UNKNOWN: MarkerStyle = MarkerStyle {
    icon: "question",
    color: "gray",
};
pub const STYLE_STATION: MarkerStyle = MarkerStyle {
    icon: "star",
    color: "green",
};
pub const STYLE_CENTER: MarkerStyle = MarkerStyle {
    icon: "diamond",
    color: "orange",
};

const LINE_COLOR: &str = "blue";
const LOST_NAME: &str = "lost name";

/// Fixed classification table for flat entity markers.
pub fn classify(tags: &HashMap<String, String>) -> MarkerStyle {
    if tags.contains_key("building") {
        STYLE_BUILDING
    } else if tags.contains_key("public_transport") {
        STYLE_TRANSPORT
    } else {
        STYLE_UNKNOWN
    }
}

pub fn display_name(entity: &Entity) -> &str {
    entity.name().unwrap_or(LOST_NAME)
}

#[derive(Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    popup: String,
    #[serde(flatten)]
    style: MarkerStyle,
}

#[derive(Serialize)]
struct Polyline {
    // [lat, lon] pairs, the order Leaflet expects
    points: Vec<[f64; 2]>,
    color: &'static str,
}

pub struct MapDocument {
    center_lon: f64,
    center_lat: f64,
    zoom: u32,
    markers: Vec<Marker>,
    polylines: Vec<Polyline>,
}

impl MapDocument {
    pub fn new(center_lon: f64, center_lat: f64) -> Self {
        MapDocument {
            center_lon,
            center_lat,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            polylines: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, lon: f64, lat: f64, label: &str, style: MarkerStyle) {
        self.markers.push(Marker {
            lat,
            lon,
            popup: format!("<i>{label}</i>"),
            style,
        });
    }

    /// One classified marker per entity, labelled by its `name` tag.
    pub fn add_entities(&mut self, entities: &[Arc<Entity>]) {
        for entity in entities {
            let style = classify(&entity.tags);
            self.add_marker(entity.lon, entity.lat, display_name(entity), style);
        }
    }

    /// Station markers plus one connecting polyline per bus line, keeping
    /// member order.
    pub fn add_bus_lines(&mut self, lines: &[BusLine]) {
        for line in lines {
            let mut points = Vec::with_capacity(line.stations.len());
            for station in &line.stations {
                let label = format!("{}-{}", line.name, display_name(station));
                self.add_marker(station.lon, station.lat, &label, STYLE_STATION);
                points.push([station.lat, station.lon]);
            }
            if !points.is_empty() {
                self.polylines.push(Polyline {
                    points,
                    color: LINE_COLOR,
                });
            }
        }
    }

    /// The fixed reference marker at the map center.
    pub fn add_center_marker(&mut self, label: &str) {
        self.add_marker(self.center_lon, self.center_lat, label, STYLE_CENTER);
    }

    pub fn to_html(&self) -> Result<String> {
        let html = TEMPLATE
            .replace("__LAT__", &self.center_lat.to_string())
            .replace("__LON__", &self.center_lon.to_string())
            .replace("__ZOOM__", &self.zoom.to_string())
            .replace("__MARKERS__", &json_literal(&self.markers)?)
            .replace("__POLYLINES__", &json_literal(&self.polylines)?);
        Ok(html)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// JSON safe to inline in a `<script>` block: `<` is escaped so an entity
/// name can never close the tag.
fn json_literal<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>osm-busway</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([__LAT__, __LON__], __ZOOM__);
L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
var markers = __MARKERS__;
var polylines = __POLYLINES__;
markers.forEach(function (m) {
    L.circleMarker([m.lat, m.lon], {
        radius: 7,
        color: m.color,
        fillColor: m.color,
        fillOpacity: 0.8,
        className: "icon-" + m.icon
    }).bindPopup(m.popup).addTo(map);
});
polylines.forEach(function (line) {
    L.polyline(line.points, { color: line.color }).addTo(map);
});
</script>
</body>
</html>
"#;
