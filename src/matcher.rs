//! Texture discovery and category matching.
//!
//! Scans a folder recursively for texture files and binds the best candidate
//! to each category: the candidate's file stem must contain the category
//! name as a substring, and among matches the shortest stem wins. Ties keep
//! the first candidate in enumeration order; glob enumerates in sorted
//! order, so matching a fixed folder snapshot twice yields identical
//! assignments.

use crate::category::{Category, SheetAssignment};
use glob::glob;
use std::path::{Path, PathBuf};

/// File extensions treated as textures.
pub const TEXTURE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Whether a path looks like a texture file.
pub fn is_texture_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            TEXTURE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Enumerate texture files under `root`, recursively, in sorted order.
///
/// The root is a literal path, so metacharacters in folder names (`[`,
/// `*`, `?`) are escaped before the recursive wildcard is appended.
/// Unreadable entries are skipped; a missing root yields no files.
pub fn texture_files(root: &Path) -> Vec<PathBuf> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let pattern_str = format!(
        "{}{}**{}*",
        escaped_root,
        std::path::MAIN_SEPARATOR,
        std::path::MAIN_SEPARATOR
    );

    let Ok(paths) = glob(&pattern_str) else {
        return Vec::new();
    };

    paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_texture_file(path))
        .collect()
}

/// Bind the best-matching texture under `root` to each category.
///
/// A category with no matching candidate stays unassigned; that is not an
/// error. Pure scan; nothing on disk is touched.
pub fn match_folder(root: &Path, categories: &[Category]) -> Vec<SheetAssignment> {
    let files = texture_files(root);

    categories
        .iter()
        .map(|category| {
            let mut best: Option<&PathBuf> = None;
            let mut shortest = usize::MAX;

            for path in &files {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if stem.contains(&category.name) && stem.len() < shortest {
                    best = Some(path);
                    shortest = stem.len();
                }
            }

            match best {
                Some(path) => SheetAssignment::assigned(category.clone(), path.clone()),
                None => SheetAssignment::unassigned(category.clone()),
            }
        })
        .collect()
}
