use std::path::PathBuf;

use thiserror::Error;

use crate::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal for a pipeline run; there is no retry or
/// degraded-mode output, so the variants only carry context for the log line.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed OSM document {path}: {source}")]
    Xml {
        path: PathBuf,
        source: quick_xml::DeError,
    },

    /// A cache file that exists but does not parse is never silently
    /// rebuilt; the operator deletes it by hand.
    #[error("cache file {path} is corrupt, delete it to force a rebuild: {source}")]
    Cache {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} {id} is missing required tag \"{key}\"")]
    MissingTag {
        kind: EntityKind,
        id: u64,
        key: &'static str,
    },
}
