//! Deterministic output locations for generated character assets.
//!
//! Everything the pipeline writes is keyed by (mods root, character name),
//! so re-running it overwrites the same files; that makes a partial failure
//! recoverable by simply running the pipeline again.

use std::path::{Path, PathBuf};

/// `{root}/{character}` - the character's output folder.
pub fn character_dir(mods_root: &Path, character: &str) -> PathBuf {
    mods_root.join(character)
}

/// `{root}/{character}/{character}_Library.json`
pub fn library_path(mods_root: &Path, character: &str) -> PathBuf {
    character_dir(mods_root, character).join(format!("{}_Library.json", character))
}

/// `{root}/{character}/AdditionalNames.json`
pub fn sidecar_path(mods_root: &Path, character: &str) -> PathBuf {
    character_dir(mods_root, character).join("AdditionalNames.json")
}

/// `{root}/{character}/{character}_Atlas.png`
pub fn atlas_image_path(mods_root: &Path, character: &str) -> PathBuf {
    character_dir(mods_root, character).join(format!("{}_Atlas.png", character))
}

/// `{root}/{character}/{character}_Atlas.json`
pub fn atlas_meta_path(mods_root: &Path, character: &str) -> PathBuf {
    character_dir(mods_root, character).join(format!("{}_Atlas.json", character))
}

/// `{root}/{character}/Bundle` - where bundle artifacts land.
pub fn bundle_dir(mods_root: &Path, character: &str) -> PathBuf {
    character_dir(mods_root, character).join("Bundle")
}

/// `{root}/{character}/Bundle/{character-lowercased}{suffix}`
pub fn bundle_path(mods_root: &Path, character: &str, suffix: &str) -> PathBuf {
    bundle_dir(mods_root, character).join(format!("{}{}", character.to_lowercase(), suffix))
}
