//! Sprite library assembly and the additional-names sidecar.
//!
//! The library maps (category, frame label) to a sprite. Only categories
//! whose sheet is both assigned and sliced contribute entries; partial
//! libraries are valid and expected while a character is being authored.

use crate::category::SheetAssignment;
use crate::meta;
use crate::paths;
use crate::slicer;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during library assembly.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Output write failure
    #[error("failed to write library output: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure
    #[error("failed to serialize library output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One (category, label) -> sprite binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub category: String,
    /// Positional frame index as a string, dense from "0"
    pub label: String,
    /// Sub-sprite name within the source texture
    pub sprite: String,
    /// Source texture path
    pub texture: PathBuf,
}

/// A character's assembled sprite library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteLibrary {
    pub name: String,
    pub entries: Vec<LibraryEntry>,
}

impl SpriteLibrary {
    /// Entries belonging to one category, in label order.
    pub fn category_entries<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a LibraryEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Category names that contributed at least one entry.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if names.last() != Some(&entry.category.as_str())
                && !names.contains(&entry.category.as_str())
            {
                names.push(&entry.category);
            }
        }
        names
    }
}

/// The `AdditionalNames.json` sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameSidecar {
    pub main_name: String,
    pub names: Vec<String>,
}

/// Result of one assembly run.
#[derive(Debug)]
pub struct AssembledLibrary {
    pub library: SpriteLibrary,
    pub library_path: PathBuf,
    pub sidecar_path: PathBuf,
}

/// Assemble a character's sprite library and name sidecar.
///
/// For every assignment whose sheet is present and sliced, the committed
/// slice list is re-derived in ascending name order and one entry is added
/// per slice at its positional index. Unassigned or unsliced categories
/// contribute nothing; a sheet whose metadata cannot be read is skipped
/// with a warning so one bad sheet never blocks the rest.
///
/// Outputs land at the deterministic paths under `mods_root` and overwrite
/// whatever was there.
pub fn assemble(
    assignments: &[SheetAssignment],
    character: &str,
    additional_names: &[String],
    mods_root: &Path,
) -> Result<AssembledLibrary, LibraryError> {
    let mut entries = Vec::new();

    for assignment in assignments {
        let Some(sheet) = &assignment.sheet else {
            continue;
        };

        let texture_meta = match meta::load(sheet) {
            Ok(m) => m,
            Err(e) => {
                warn!(
                    "skipping '{}' for {}: {}",
                    sheet.display(),
                    assignment.category,
                    e
                );
                continue;
            }
        };
        if !slicer::is_sliced(&texture_meta) {
            continue;
        }

        let mut slices = texture_meta.slices;
        slices.sort_by(|a, b| a.name.cmp(&b.name));

        for (index, slice) in slices.iter().enumerate() {
            entries.push(LibraryEntry {
                category: assignment.category.name.clone(),
                label: index.to_string(),
                sprite: slice.name.clone(),
                texture: sheet.clone(),
            });
        }
    }

    let library = SpriteLibrary {
        name: character.to_string(),
        entries,
    };
    let sidecar = NameSidecar {
        main_name: character.to_string(),
        names: additional_names.to_vec(),
    };

    fs::create_dir_all(paths::character_dir(mods_root, character))?;

    let library_path = paths::library_path(mods_root, character);
    fs::write(&library_path, serde_json::to_string_pretty(&library)?)?;

    let sidecar_path = paths::sidecar_path(mods_root, character);
    fs::write(&sidecar_path, serde_json::to_string_pretty(&sidecar)?)?;

    Ok(AssembledLibrary {
        library,
        library_path,
        sidecar_path,
    })
}
