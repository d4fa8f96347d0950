//! Tool configuration file model (`apikey-gen.toml`).

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub keygen: KeygenSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeygenSection {
    /// Length of generated keys.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Property holding the accepted keys.
    #[serde(default = "default_property")]
    pub property: String,

    /// Properties file to update (relative paths resolve against the working directory).
    #[serde(default)]
    pub properties_path: Option<PathBuf>,

    #[serde(default)]
    pub write_mode: WriteMode,

    /// Hold an advisory lock on `<file>.lock` during updates.
    #[serde(default)]
    pub lock: bool,

    /// Use rejection sampling instead of the modulo mapping.
    #[serde(default)]
    pub unbiased: bool,
}

impl Default for KeygenSection {
    fn default() -> Self {
        Self {
            length: default_length(),
            property: default_property(),
            properties_path: None,
            write_mode: WriteMode::default(),
            lock: false,
            unbiased: false,
        }
    }
}

/// How the updated document reaches the disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Truncate and rewrite the file in place. A failed write may leave it truncated.
    #[default]
    InPlace,
    /// Write a sibling temp file and rename it over the original.
    Atomic,
}

fn default_length() -> usize {
    constants::DEFAULT_KEY_LENGTH
}

fn default_property() -> String {
    constants::DEFAULT_PROPERTY_KEY.to_string()
}
