//! Pipeline orchestration.
//!
//! Two entry points mirror the two interactive actions: [`auto_assign`]
//! (match textures to categories, normalize, slice, pack the atlas) and
//! [`generate`] (re-normalize and re-slice everything assigned, assemble
//! the library and sidecar, export the bundle).
//!
//! Failure policy: a missing sprite folder is a precondition error and
//! aborts the step with nothing touched. A single bad sheet is skipped with
//! a warning so the other categories proceed. A packaging failure surfaces
//! as an absent bundle path, never as a pipeline abort.

use crate::atlas;
use crate::bundle;
use crate::category::{default_categories, SheetAssignment};
use crate::config::ModkitConfig;
use crate::importer;
use crate::library::{self, LibraryError};
use crate::meta;
use crate::paths;
use crate::slicer;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error aborting a pipeline step.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sprite folder to scan does not exist
    #[error("sprite folder not found: {}", .0.display())]
    MissingFolder(PathBuf),
    /// Library or sidecar output could not be written
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Result of a [`generate`] run.
#[derive(Debug)]
pub struct GenerateOutput {
    pub library_path: PathBuf,
    pub sidecar_path: PathBuf,
    pub entry_count: usize,
    /// Produced bundle, or `None` if packaging failed
    pub bundle: Option<PathBuf>,
}

/// Normalize and slice one assigned sheet. Returns whether the sheet ended
/// up committed; failures are logged and swallowed so the batch continues.
fn prepare_sheet(config: &ModkitConfig, assignment: &SheetAssignment) -> bool {
    let Some(sheet) = &assignment.sheet else {
        return false;
    };

    if let Err(e) = importer::normalize(sheet) {
        warn!(
            "skipping '{}' for {}: normalize failed: {}",
            sheet.display(),
            assignment.category,
            e
        );
        return false;
    }

    match slicer::slice_texture(sheet, &assignment.category.name, config.columns, config.rows) {
        Ok(_) => true,
        Err(e) => {
            warn!(
                "skipping '{}' for {}: slice failed: {}",
                sheet.display(),
                assignment.category,
                e
            );
            false
        }
    }
}

/// Pack the atlas for every sheet with committed slices.
///
/// Atlas failures never abort the pipeline; the character just ends up
/// without an atlas and the bundle later excludes it.
fn pack_character_atlas(config: &ModkitConfig, assignments: &[SheetAssignment], character: &str) {
    let mut sprites = Vec::new();
    for assignment in assignments {
        let Some(sheet) = &assignment.sheet else {
            continue;
        };
        let Ok(texture_meta) = meta::load(sheet) else {
            continue;
        };
        if texture_meta.slices.is_empty() {
            continue;
        }
        match atlas::cut_slices(sheet, &texture_meta.slices) {
            Ok(mut cut) => sprites.append(&mut cut),
            Err(e) => warn!("atlas: skipping '{}': {}", sheet.display(), e),
        }
    }

    if sprites.is_empty() {
        return;
    }

    let image_path = paths::atlas_image_path(&config.mods_root, character);
    let meta_path = paths::atlas_meta_path(&config.mods_root, character);
    let image_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let atlas_config = atlas::AtlasConfig::from(&config.atlas);
    match atlas::pack_atlas(&sprites, &atlas_config, &image_name) {
        Ok((page, metadata)) => {
            if let Err(e) = atlas::write_atlas(&page, &metadata, &image_path, &meta_path) {
                error!("atlas write failed: {}", e);
            } else {
                info!("atlas created at {}", image_path.display());
            }
        }
        Err(e) => error!("atlas packing failed: {}", e),
    }
}

/// Scan `folder` and bind, normalize, and slice a sheet for every category
/// it can, then pack the character's atlas from everything sliced.
///
/// Categories without a matching texture stay unassigned; that is not an
/// error. The folder itself must exist.
pub fn auto_assign(
    config: &ModkitConfig,
    folder: &Path,
    character: &str,
) -> Result<Vec<SheetAssignment>, PipelineError> {
    if !folder.is_dir() {
        return Err(PipelineError::MissingFolder(folder.to_path_buf()));
    }

    let assignments = crate::matcher::match_folder(folder, &default_categories());

    for assignment in assignments.iter().filter(|a| a.is_assigned()) {
        prepare_sheet(config, assignment);
    }

    pack_character_atlas(config, &assignments, character);

    Ok(assignments)
}

/// Build the character's library, sidecar, and bundle from the given
/// assignments.
///
/// Every assigned sheet is re-normalized and re-sliced first, so the
/// committed metadata reflects the current files. Packaging failure is
/// reported as `bundle: None`; the caller must check it before offering an
/// upload.
pub fn generate(
    config: &ModkitConfig,
    assignments: &[SheetAssignment],
    character: &str,
    additional_names: &[String],
) -> Result<GenerateOutput, PipelineError> {
    for assignment in assignments.iter().filter(|a| a.is_assigned()) {
        prepare_sheet(config, assignment);
    }

    let assembled = library::assemble(assignments, character, additional_names, &config.mods_root)?;
    info!(
        "library created at {} ({} entries)",
        assembled.library_path.display(),
        assembled.library.entries.len()
    );

    let candidates = vec![
        assembled.library_path.clone(),
        assembled.sidecar_path.clone(),
        paths::atlas_image_path(&config.mods_root, character),
        paths::atlas_meta_path(&config.mods_root, character),
    ];
    let output_dir = paths::bundle_dir(&config.mods_root, character);

    let bundle = match bundle::export_bundle(
        &candidates,
        character,
        &config.bundle_suffix,
        &output_dir,
    ) {
        Ok(path) => {
            info!("bundle exported to {}", path.display());
            Some(path)
        }
        Err(e) => {
            error!("bundle export failed: {}", e);
            None
        }
    };

    Ok(GenerateOutput {
        entry_count: assembled.library.entries.len(),
        library_path: assembled.library_path,
        sidecar_path: assembled.sidecar_path,
        bundle,
    })
}
