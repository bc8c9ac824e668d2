//! Configuration loading and discovery for `modkit.toml`
//!
//! Every field has a default; a project without a config file gets the
//! stock pipeline (8x1 slicing, `Mods/` output root, 2048 atlas pages).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name searched for when none is given explicitly.
pub const CONFIG_FILE: &str = "modkit.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse modkit.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Atlas packing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasSettings {
    /// Maximum page dimension in pixels
    pub max_size: u32,
    /// Padding between packed slices in pixels
    pub padding: u32,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            max_size: 2048,
            padding: 4,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModkitConfig {
    /// Root directory that character output folders are created under
    pub mods_root: PathBuf,
    /// Frames per sheet row
    pub columns: u32,
    /// Rows per sheet
    pub rows: u32,
    /// Suffix appended to the lowercased character name for bundle files
    pub bundle_suffix: String,
    pub atlas: AtlasSettings,
}

impl Default for ModkitConfig {
    fn default() -> Self {
        Self {
            mods_root: PathBuf::from("Mods"),
            columns: crate::slicer::DEFAULT_COLUMNS,
            rows: crate::slicer::DEFAULT_ROWS,
            bundle_suffix: ".customer".to_string(),
            atlas: AtlasSettings::default(),
        }
    }
}

/// Find `modkit.toml` by walking up from a start directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an explicit path, or discover it by walking up
/// from the current directory. No file anywhere means defaults.
pub fn load_config(path: Option<&Path>) -> Result<ModkitConfig, ConfigError> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::current_dir().ok().and_then(find_config_from),
    };

    match path {
        Some(p) => {
            let text = fs::read_to_string(p)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(ModkitConfig::default()),
    }
}
