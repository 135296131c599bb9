//! Geographic and tag-based selection over the extracted entity list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{BusLine, Entity, EntityKind, Error, Result};

/// Axis-aligned lon/lat rectangle with inclusive bounds.
///
/// Ways and relations carry the `-1, -1` sentinel coordinate, so any real
/// bounding box drops them from a flat selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        BoundingBox {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        }
    }

    /// Square box of `size` degrees centered on a point.
    pub fn around(lon: f64, lat: f64, size: f64) -> Self {
        let half = size / 2.0;
        BoundingBox::new(lon - half, lat - half, lon + half, lat + half)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }
}

/// Flat selection: keep entities inside `bbox` whose tag keys intersect
/// `tag_filter`, truncated to the first `max_results` in input order.
pub fn select(
    entities: &[Arc<Entity>],
    bbox: Option<&BoundingBox>,
    tag_filter: Option<&HashSet<String>>,
    max_results: Option<usize>,
) -> Vec<Arc<Entity>> {
    let mut selected: Vec<Arc<Entity>> = entities
        .iter()
        .filter(|ent| bbox.map_or(true, |b| b.contains(ent.lon, ent.lat)))
        .filter(|ent| tag_filter.map_or(true, |keys| ent.tags.keys().any(|k| keys.contains(k))))
        .cloned()
        .collect();
    if let Some(max) = max_results {
        selected.truncate(max);
    }
    selected
}

/// Reconstruct bus lines from `route=bus` relations: resolve each member
/// against a (kind, id) index, keep stations inside `bbox` in member order,
/// and drop lines with fewer than two surviving stations. When `max_count`
/// is exceeded the result is a random sample drawn with the caller's rng.
///
/// A qualifying relation without a `name` tag aborts the selection.
pub fn select_bus_lines<R: Rng>(
    entities: &[Arc<Entity>],
    bbox: &BoundingBox,
    max_count: Option<usize>,
    rng: &mut R,
) -> Result<Vec<BusLine>> {
    // OSM ids are only unique per kind, so the index key carries the kind.
    let index: HashMap<(EntityKind, u64), Arc<Entity>> = entities
        .iter()
        .map(|ent| ((ent.kind, ent.id), Arc::clone(ent)))
        .collect();

    let mut lines = Vec::new();
    for relation in entities.iter().filter(|ent| ent.kind == EntityKind::Relation) {
        let Some(members) = &relation.members else {
            continue;
        };
        let stations: Vec<Arc<Entity>> = members
            .iter()
            .filter_map(|member| index.get(&(member.kind, member.reference)))
            .filter(|station| bbox.contains(station.lon, station.lat))
            .map(Arc::clone)
            .collect();
        if stations.len() > 1 {
            let name = relation.name().ok_or(Error::MissingTag {
                kind: relation.kind,
                id: relation.id,
                key: "name",
            })?;
            lines.push(BusLine {
                name: name.to_string(),
                stations,
            });
        }
    }

    if let Some(max) = max_count {
        if max < lines.len() {
            lines.shuffle(rng);
            lines.truncate(max);
        }
    }
    Ok(lines)
}
