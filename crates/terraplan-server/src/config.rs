//! Named game presets, loaded from YAML. The embedded set ships with the
//! binary; operators can point at their own file instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use terraplan_protocol::GameConfig;
use thiserror::Error;

const EMBEDDED: &str = include_str!("presets.yaml");

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("cannot read preset file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed preset file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown preset {0:?}")]
    Unknown(String),
}

pub enum PresetSource<'a> {
    Embedded,
    Path(&'a Path),
}

/// Load the full preset map.
pub fn load_presets(source: PresetSource<'_>) -> Result<HashMap<String, GameConfig>, PresetError> {
    let text = match source {
        PresetSource::Embedded => EMBEDDED.to_string(),
        PresetSource::Path(path) => std::fs::read_to_string(path).map_err(|source| {
            PresetError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?,
    };
    Ok(serde_yaml::from_str(&text)?)
}

/// Look up one preset by name.
pub fn preset(source: PresetSource<'_>, name: &str) -> Result<GameConfig, PresetError> {
    load_presets(source)?
        .remove(name)
        .ok_or_else(|| PresetError::Unknown(name.to_string()))
}
