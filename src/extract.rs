//! Raw OSM XML document shapes and the entity extractor.
//!
//! The `Osm` tree mirrors the XML attribute layout one-to-one; extraction
//! flattens it into the uniform [`Entity`] records the rest of the pipeline
//! works with, applying one inclusion predicate per entity kind.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Entity, EntityKind, Error, Result};

#[derive(Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "@id")]
    pub id: u64,
    #[serde(rename = "@lat")]
    pub lat: f64,
    #[serde(rename = "@lon")]
    pub lon: f64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    pub tag: Option<Vec<Tag>>,
}

#[derive(Deserialize, Serialize)]
pub struct Nd {
    #[serde(rename = "@ref")]
    pub reference: u64,
}

#[derive(Deserialize, Serialize)]
pub struct Tag {
    #[serde(rename = "@k")]
    pub k: String,
    #[serde(rename = "@v")]
    pub v: String,
}

#[derive(Deserialize, Serialize)]
pub struct Way {
    #[serde(rename = "@id")]
    pub id: u64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    pub nd: Vec<Nd>,
    pub tag: Option<Vec<Tag>>,
}

#[derive(Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "@type")]
    pub member_type: EntityKind,
    #[serde(rename = "@ref")]
    pub member_ref: u64,
    #[serde(rename = "@role", default)]
    pub role: String,
}

#[derive(Deserialize, Serialize)]
pub struct Relation {
    #[serde(rename = "@id")]
    pub id: u64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    pub member: Vec<Member>,
    pub tag: Option<Vec<Tag>>,
}

#[derive(Deserialize, Serialize)]
pub struct Osm {
    #[serde(default)]
    pub node: Vec<Node>,
    #[serde(default)]
    pub way: Vec<Way>,
    #[serde(default)]
    pub relation: Vec<Relation>,
}

fn default_visible() -> bool {
    true
}

/// Per-kind inclusion switches for extraction.
#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    pub nodes: bool,
    pub ways: bool,
    pub relations: bool,
    /// Keep every node instead of only `highway=bus_stop` stops.
    pub all_nodes: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            nodes: true,
            ways: true,
            relations: true,
            all_nodes: false,
        }
    }
}

pub fn read_osm(path: &Path) -> Result<Osm> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    quick_xml::de::from_reader(BufReader::new(file)).map_err(|source| Error::Xml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn extract_entities(path: &Path, options: &ExtractOptions) -> Result<Vec<Arc<Entity>>> {
    let osm = read_osm(path)?;
    Ok(entities_from_osm(&osm, options))
}

pub fn entities_from_osm(osm: &Osm, options: &ExtractOptions) -> Vec<Arc<Entity>> {
    let mut entities = Vec::new();
    if options.nodes {
        for node in &osm.node {
            let tags = tag_map(&node.tag);
            if options.all_nodes || is_bus_stop(&tags) {
                entities.push(Arc::new(Entity::node(
                    node.id,
                    node.lon,
                    node.lat,
                    node.visible,
                    tags,
                )));
            }
        }
    }
    if options.ways {
        for way in &osm.way {
            entities.push(Arc::new(Entity::way(
                way.id,
                way.visible,
                tag_map(&way.tag),
                way.nd.iter().map(|nd| nd.reference).collect(),
            )));
        }
    }
    if options.relations {
        for relation in &osm.relation {
            let tags = tag_map(&relation.tag);
            if !is_bus_route(&tags) {
                continue;
            }
            let members = relation
                .member
                .iter()
                .map(|member| crate::Member {
                    reference: member.member_ref,
                    kind: member.member_type,
                    role: member.role.clone(),
                })
                .collect();
            entities.push(Arc::new(Entity::relation(
                relation.id,
                relation.visible,
                tags,
                members,
            )));
        }
    }
    entities
}

fn tag_map(tags: &Option<Vec<Tag>>) -> HashMap<String, String> {
    tags.iter()
        .flatten()
        .map(|tag| (tag.k.clone(), tag.v.clone()))
        .collect()
}

fn is_bus_stop(tags: &HashMap<String, String>) -> bool {
    tags.get("highway").map(String::as_str) == Some("bus_stop")
}

fn is_bus_route(tags: &HashMap<String, String>) -> bool {
    tags.get("route").map(String::as_str) == Some("bus")
}
