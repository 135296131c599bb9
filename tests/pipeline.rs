//! End-to-end pipeline test over a small in-repo extract: parse, cache,
//! select the bus line, render the map document.

use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;

use osm_busway::extract::{self, ExtractOptions};
use osm_busway::render::MapDocument;
use osm_busway::select::{self, BoundingBox};
use osm_busway::{cache, EntityKind};

const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <node id="1" lat="30.2450" lon="120.1400">
    <tag k="highway" v="bus_stop"/>
    <tag k="name" v="Central"/>
  </node>
  <node id="2" lat="30.2460" lon="120.1450">
    <tag k="highway" v="bus_stop"/>
    <tag k="name" v="North Gate"/>
  </node>
  <node id="3" lat="31.0000" lon="121.5000">
    <tag k="highway" v="bus_stop"/>
    <tag k="name" v="Far Terminal"/>
  </node>
  <node id="4" lat="30.2455" lon="120.1420">
    <tag k="amenity" v="cafe"/>
  </node>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
  </way>
  <relation id="20">
    <member type="node" ref="1" role="stop"/>
    <member type="node" ref="3" role="stop"/>
    <member type="node" ref="2" role="stop"/>
    <tag k="route" v="bus"/>
    <tag k="name" v="12"/>
  </relation>
</osm>"#;

#[test]
fn extract_cache_select_render() {
    let dir = tempfile::tempdir().unwrap();
    let osm_path = dir.path().join("fixture.osm");
    fs::write(&osm_path, FIXTURE).unwrap();
    let cache_path = dir.path().join("busway.json");

    let options = ExtractOptions::default();
    let entities =
        cache::load_or_build(&cache_path, || extract::extract_entities(&osm_path, &options))
            .unwrap();
    assert!(cache_path.exists());
    // the cafe node has no highway=bus_stop tag and is not extracted
    assert_eq!(entities.len(), 5);
    assert!(entities
        .iter()
        .filter(|ent| ent.kind == EntityKind::Node)
        .all(|ent| ent.tags.get("highway").map(String::as_str) == Some("bus_stop")));

    // second run comes from the cache, field for field
    let reloaded = cache::load_or_build(&cache_path, || panic!("cache must be reused")).unwrap();
    assert_eq!(entities, reloaded);

    let bbox = BoundingBox::around(120.1417, 30.2458, 0.05);
    let mut rng = StdRng::seed_from_u64(7);
    let lines = select::select_bus_lines(&reloaded, &bbox, Some(10), &mut rng).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "12");
    let names: Vec<_> = lines[0]
        .stations
        .iter()
        .map(|station| station.name().unwrap())
        .collect();
    assert_eq!(names, vec!["Central", "North Gate"]);

    let mut document = MapDocument::new(120.1417, 30.2458);
    document.add_bus_lines(&lines);
    document.add_center_marker("west lake");
    let out = dir.path().join("map.html");
    document.write(&out).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("leaflet"));
    assert!(html.contains("12-Central"));
    assert!(html.contains("12-North Gate"));
    assert!(!html.contains("Far Terminal"));
    assert!(html.contains("west lake"));
}
