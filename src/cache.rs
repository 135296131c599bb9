//! Write-once JSON cache for extracted entities.
//!
//! The first run pays the XML parse and writes the cache; every later run
//! loads it verbatim. An existing cache is trusted: a file that fails to
//! parse aborts the run instead of silently re-extracting.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use log::warn;

use crate::{Entity, Error, Result};

pub fn load_or_build<F>(path: &Path, build: F) -> Result<Vec<Arc<Entity>>>
where
    F: FnOnce() -> Result<Vec<Arc<Entity>>>,
{
    if path.exists() {
        warn!("loading entities from cache {}", path.display());
        return load(path);
    }
    let entities = build()?;
    store(path, &entities)?;
    Ok(entities)
}

pub fn load(path: &Path) -> Result<Vec<Arc<Entity>>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Cache {
        path: path.to_path_buf(),
        source,
    })
}

pub fn store(path: &Path, entities: &[Arc<Entity>]) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), entities)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{EntityKind, Member};
    use std::collections::HashMap;

    fn sample_entities() -> Vec<Arc<Entity>> {
        let mut stop_tags = HashMap::new();
        stop_tags.insert("highway".to_string(), "bus_stop".to_string());
        stop_tags.insert("name".to_string(), "Central".to_string());
        let mut line_tags = HashMap::new();
        line_tags.insert("route".to_string(), "bus".to_string());
        line_tags.insert("name".to_string(), "12".to_string());
        vec![
            Arc::new(Entity::node(1, 120.14, 30.245, true, stop_tags)),
            Arc::new(Entity::way(10, true, HashMap::new(), vec![1, 2, 3])),
            Arc::new(Entity::relation(
                20,
                true,
                line_tags,
                vec![Member {
                    reference: 1,
                    kind: EntityKind::Node,
                    role: "stop".to_string(),
                }],
            )),
        ]
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busway.json");
        let entities = sample_entities();
        store(&path, &entities).unwrap();
        let reloaded = load(&path).unwrap();
        assert_eq!(entities, reloaded);
        // refs/members nullability survives the trip
        assert_eq!(reloaded[0].refs, None);
        assert_eq!(reloaded[0].members, None);
        assert_eq!(reloaded[1].refs, Some(vec![1, 2, 3]));
        assert_eq!(reloaded[2].members.as_ref().unwrap()[0].role, "stop");
    }

    #[test]
    fn kind_is_serialized_as_the_type_discriminator() {
        let json = serde_json::to_value(&sample_entities()[0]).unwrap();
        assert_eq!(json["type"], "node");
        assert_eq!(json["refs"], serde_json::Value::Null);
    }

    #[test]
    fn miss_builds_then_hit_loads_without_rebuilding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busway.json");
        let entities = load_or_build(&path, || Ok(sample_entities())).unwrap();
        assert!(path.exists());
        let reloaded = load_or_build(&path, || panic!("cache must be reused")).unwrap();
        assert_eq!(entities, reloaded);
    }

    #[test]
    fn corrupt_cache_is_fatal_not_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busway.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_or_build(&path, || Ok(sample_entities())).unwrap_err();
        assert!(matches!(err, Error::Cache { .. }));
    }
}
