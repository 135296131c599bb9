pub mod cache;
pub mod error;
pub mod extract;
pub mod render;
pub mod select;

pub use error::{Error, Result};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Sentinel coordinate for entities without a single location (ways, relations).
pub const NO_COORD: f64 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node,
    Way,
    Relation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Node => "node",
            EntityKind::Way => "way",
            EntityKind::Relation => "relation",
        })
    }
}

/// One member entry of a relation: a typed, role-tagged reference.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "ref")]
    pub reference: u64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub role: String,
}

/// Uniform record for an extracted OSM node, way, or relation.
///
/// `kind` determines the rest of the shape: only nodes carry meaningful
/// coordinates, only ways carry `refs`, only relations carry `members`.
/// The `type` field doubles as the discriminator in the JSON cache.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Entity {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub lon: f64,
    pub lat: f64,
    pub visible: bool,
    pub tags: HashMap<String, String>,
    pub refs: Option<Vec<u64>>,
    pub members: Option<Vec<Member>>,
}

impl Entity {
    pub fn node(id: u64, lon: f64, lat: f64, visible: bool, tags: HashMap<String, String>) -> Self {
        Entity {
            id,
            kind: EntityKind::Node,
            lon,
            lat,
            visible,
            tags,
            refs: None,
            members: None,
        }
    }

    pub fn way(id: u64, visible: bool, tags: HashMap<String, String>, refs: Vec<u64>) -> Self {
        Entity {
            id,
            kind: EntityKind::Way,
            lon: NO_COORD,
            lat: NO_COORD,
            visible,
            tags,
            refs: Some(refs),
            members: None,
        }
    }

    pub fn relation(
        id: u64,
        visible: bool,
        tags: HashMap<String, String>,
        members: Vec<Member>,
    ) -> Self {
        Entity {
            id,
            kind: EntityKind::Relation,
            lon: NO_COORD,
            lat: NO_COORD,
            visible,
            tags,
            refs: None,
            members: Some(members),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}

/// A bus route reconstructed from a `route=bus` relation, holding the
/// stations that survived the bounding-box filter in member order.
/// Derived transiently during selection, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct BusLine {
    pub name: String,
    pub stations: Vec<Arc<Entity>>,
}
