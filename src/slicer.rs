//! Sprite-sheet slicing.
//!
//! A sheet is a single row of equal-width frames. Slicing splits it into
//! `columns` sub-sprites named `{category}_{index}`, left to right, each
//! pivoted at bottom-center, and commits them as the texture's sub-sprite
//! metadata.
//!
//! Widths that are not an exact multiple of `columns` are not rejected:
//! integer division truncates and the remainder pixels on the right edge are
//! excluded from every slice. Downstream code considers a sheet "sliced"
//! only once it carries at least [`SLICED_MIN_SPRITES`] sub-sprites; that
//! threshold is fixed and does not track the requested column count, so a
//! sheet sliced into fewer columns is never recognized as sliced.

use crate::meta::{self, MetaError, TextureMeta};
use crate::importer::SpriteMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default number of frames per sheet row.
pub const DEFAULT_COLUMNS: u32 = 8;

/// Default number of rows per sheet.
pub const DEFAULT_ROWS: u32 = 1;

/// Minimum committed sub-sprite count for a sheet to count as sliced.
pub const SLICED_MIN_SPRITES: usize = 8;

/// Bottom-center pivot applied to every slice.
pub const SLICE_PIVOT: [f32; 2] = [0.5, 0.0];

/// Error during slicing.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Texture is missing or not a decodable image
    #[error("failed to read texture: {0}")]
    Image(#[from] image::ImageError),
    /// Sidecar read/write failure
    #[error(transparent)]
    Meta(#[from] MetaError),
    /// A zero grid dimension was requested
    #[error("columns and rows must be nonzero (got {columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },
}

/// One rectangular sub-region of a sheet, in pixels, origin at bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A named slice with its rect and normalized pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceMeta {
    pub name: String,
    pub rect: SliceRect,
    pub pivot: [f32; 2],
}

/// Compute the slice list for a sheet of the given dimensions.
///
/// Slice `i` covers `(i * w/columns, 0, w/columns, h/rows)` with integer
/// division; names are `{category}_{i}` with `i` increasing left to right.
pub fn compute_slices(
    width: u32,
    height: u32,
    category: &str,
    columns: u32,
    rows: u32,
) -> Vec<SliceMeta> {
    if columns == 0 || rows == 0 {
        return Vec::new();
    }

    let slice_w = width / columns;
    let slice_h = height / rows;

    (0..columns)
        .map(|i| SliceMeta {
            name: format!("{}_{}", category, i),
            rect: SliceRect {
                x: i * slice_w,
                y: 0,
                w: slice_w,
                h: slice_h,
            },
            pivot: SLICE_PIVOT,
        })
        .collect()
}

/// Slice a texture on disk and commit the result as its sub-sprite metadata.
///
/// Reads the real image dimensions, overwrites any prior slice metadata, and
/// always rewrites the sidecar (slicing always reimports). The texture is
/// forced into multi-sprite mode as part of the commit.
pub fn slice_texture(
    texture: &Path,
    category: &str,
    columns: u32,
    rows: u32,
) -> Result<Vec<SliceMeta>, SliceError> {
    if columns == 0 || rows == 0 {
        return Err(SliceError::EmptyGrid { columns, rows });
    }

    let (width, height) = image::image_dimensions(texture)?;
    let slices = compute_slices(width, height, category, columns, rows);

    let mut texture_meta = meta::load(texture)?;
    texture_meta.import.sprite_mode = SpriteMode::Multiple;
    texture_meta.slices = slices.clone();
    meta::store(texture, &texture_meta)?;

    Ok(slices)
}

/// Whether a texture's committed metadata qualifies it as sliced.
pub fn is_sliced(texture_meta: &TextureMeta) -> bool {
    texture_meta.slices.len() >= SLICED_MIN_SPRITES
}
