//! Texture import metadata sidecars.
//!
//! Each texture carries its import configuration and committed slice list in
//! a JSON sidecar next to the file (`Idle_sheet.png.import`). Writing the
//! sidecar is the "reimport": sub-sprite enumeration always reads the latest
//! committed state, so reimport semantics are synchronous by construction.

use crate::importer::ImportSettings;
use crate::slicer::SliceMeta;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension appended to the full texture file name.
pub const META_EXTENSION: &str = "import";

/// Error reading or writing an import sidecar.
#[derive(Debug, Error)]
pub enum MetaError {
    /// File I/O error
    #[error("failed to access import metadata: {0}")]
    Io(#[from] std::io::Error),
    /// Sidecar is not valid JSON
    #[error("invalid import metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Import configuration plus committed slice metadata for one texture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureMeta {
    pub import: ImportSettings,
    pub slices: Vec<SliceMeta>,
}

/// Sidecar path for a texture (`sheet.png` -> `sheet.png.import`).
pub fn meta_path(texture: &Path) -> PathBuf {
    let mut name = OsString::from(texture.as_os_str());
    name.push(".");
    name.push(META_EXTENSION);
    PathBuf::from(name)
}

/// Load a texture's sidecar. A texture without one yields the default
/// (never-imported) metadata rather than an error.
pub fn load(texture: &Path) -> Result<TextureMeta, MetaError> {
    let path = meta_path(texture);
    if !path.is_file() {
        return Ok(TextureMeta::default());
    }
    let text = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Persist a texture's sidecar, replacing any prior contents.
pub fn store(texture: &Path, meta: &TextureMeta) -> Result<(), MetaError> {
    let path = meta_path(texture);
    let text = serde_json::to_string_pretty(meta)?;
    fs::write(&path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_meta_path_appends_extension() {
        let path = meta_path(Path::new("sheets/Idle_sheet.png"));
        assert_eq!(path, PathBuf::from("sheets/Idle_sheet.png.import"));
    }

    #[test]
    fn test_missing_sidecar_yields_default() {
        let dir = tempdir().unwrap();
        let texture = dir.path().join("ghost.png");
        let meta = load(&texture).unwrap();
        assert_eq!(meta, TextureMeta::default());
        assert!(meta.slices.is_empty());
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let texture = dir.path().join("sheet.png");

        let mut meta = TextureMeta::default();
        meta.import.max_size = 4096;
        store(&texture, &meta).unwrap();

        let loaded = load(&texture).unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn test_invalid_sidecar_is_an_error() {
        let dir = tempdir().unwrap();
        let texture = dir.path().join("sheet.png");
        fs::write(meta_path(&texture), "not json").unwrap();

        assert!(matches!(load(&texture), Err(MetaError::Parse(_))));
    }
}
