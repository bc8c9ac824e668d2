//! Atlas packing - combines committed slices into one packed page.
//!
//! Cuts every committed slice out of its source sheet and arranges the lot
//! on a single page using shelf bin packing (slices sorted tallest first,
//! placed into horizontal shelves). The page is written as a PNG next to a
//! JSON metadata file mapping slice names to page rects.

use crate::importer::FilterMode;
use crate::slicer::SliceMeta;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error during atlas packing.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Source sheet missing or undecodable
    #[error("failed to read sheet: {0}")]
    Image(#[from] image::ImageError),
    /// Output write failure
    #[error("failed to write atlas: {0}")]
    Io(#[from] std::io::Error),
    /// Metadata serialization failure
    #[error("failed to serialize atlas metadata: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A slice rect falls outside its sheet
    #[error("slice '{name}' is out of bounds for its sheet")]
    SliceOutOfBounds { name: String },
    /// A slice cannot fit a page of the configured maximum size
    #[error("slice '{name}' does not fit a {max_size}px atlas page")]
    DoesNotFit { name: String, max_size: u32 },
}

/// Configuration for atlas packing
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// Maximum page dimension in pixels
    pub max_size: u32,
    /// Padding between slices in pixels
    pub padding: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_size: 2048,
            padding: 4,
        }
    }
}

impl From<&crate::config::AtlasSettings> for AtlasConfig {
    fn from(settings: &crate::config::AtlasSettings) -> Self {
        Self {
            max_size: settings.max_size,
            padding: settings.padding,
        }
    }
}

/// A slice's position and size within the page, origin at top-left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasFrame {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Sampling settings recorded for consumers of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasTextureSettings {
    pub filter_mode: FilterMode,
    pub generate_mip_maps: bool,
    pub s_rgb: bool,
}

impl Default for AtlasTextureSettings {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Point,
            generate_mip_maps: false,
            s_rgb: true,
        }
    }
}

/// Complete atlas metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasMetadata {
    /// Page image file name
    pub image: String,
    /// Page dimensions
    pub size: [u32; 2],
    pub settings: AtlasTextureSettings,
    /// Slice name -> page rect
    pub frames: BTreeMap<String, AtlasFrame>,
}

/// A named image ready to be packed.
#[derive(Debug)]
pub struct SpriteInput {
    pub name: String,
    pub image: RgbaImage,
}

/// A shelf in the shelf packing algorithm
#[derive(Debug)]
struct Shelf {
    y: u32,
    height: u32,
    width_used: u32,
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Cut a sheet's committed slices into individual images.
///
/// Slice rects use a bottom-left origin; they are flipped into image space
/// here. A rect that falls outside the sheet is an error for that sheet.
pub fn cut_slices(sheet: &Path, slices: &[SliceMeta]) -> Result<Vec<SpriteInput>, AtlasError> {
    let sheet_image = image::open(sheet)?.to_rgba8();
    let (sheet_w, sheet_h) = sheet_image.dimensions();

    let mut sprites = Vec::with_capacity(slices.len());
    for slice in slices {
        let rect = &slice.rect;
        let fits_x = rect.x.checked_add(rect.w).map(|r| r <= sheet_w);
        let fits_y = rect.y.checked_add(rect.h).map(|t| t <= sheet_h);
        if fits_x != Some(true) || fits_y != Some(true) {
            return Err(AtlasError::SliceOutOfBounds {
                name: slice.name.clone(),
            });
        }

        // Flip the bottom-left origin into image (top-left) coordinates.
        let top = sheet_h - (rect.y + rect.h);
        let cut = image::imageops::crop_imm(&sheet_image, rect.x, top, rect.w, rect.h);
        sprites.push(SpriteInput {
            name: slice.name.clone(),
            image: cut.to_image(),
        });
    }

    Ok(sprites)
}

/// Pack sprites into a single atlas page.
///
/// Sprites are sorted by height (tallest first) and placed into horizontal
/// shelves. Everything must fit one page of at most `max_size` pixels per
/// side; a sprite that cannot be placed fails the whole pack.
pub fn pack_atlas(
    sprites: &[SpriteInput],
    config: &AtlasConfig,
    image_name: &str,
) -> Result<(RgbaImage, AtlasMetadata), AtlasError> {
    let mut sorted: Vec<&SpriteInput> = sprites.iter().collect();
    sorted.sort_by(|a, b| b.image.height().cmp(&a.image.height()));

    let mut shelves: Vec<Shelf> = Vec::new();
    let mut frames: BTreeMap<String, AtlasFrame> = BTreeMap::new();

    for sprite in &sorted {
        let w = sprite.image.width();
        let h = sprite.image.height();
        let padded_w = w + config.padding;
        let padded_h = h + config.padding;

        let Some((x, y)) = place_in_shelves(&mut shelves, padded_w, padded_h, h, config.max_size)
        else {
            return Err(AtlasError::DoesNotFit {
                name: sprite.name.clone(),
                max_size: config.max_size,
            });
        };

        frames.insert(sprite.name.clone(), AtlasFrame { x, y, w, h });
    }

    let (page_w, page_h) = page_size(&shelves, config.padding);
    let mut page = RgbaImage::from_pixel(page_w, page_h, TRANSPARENT);

    for sprite in sprites {
        if let Some(frame) = frames.get(&sprite.name) {
            blit(&mut page, &sprite.image, frame.x, frame.y);
        }
    }

    let metadata = AtlasMetadata {
        image: image_name.to_string(),
        size: [page_w, page_h],
        settings: AtlasTextureSettings::default(),
        frames,
    };

    Ok((page, metadata))
}

/// Write a packed page and its metadata to disk, creating parent
/// directories as needed.
pub fn write_atlas(
    page: &RgbaImage,
    metadata: &AtlasMetadata,
    image_path: &Path,
    meta_path: &Path,
) -> Result<(), AtlasError> {
    if let Some(parent) = image_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    page.save(image_path)?;
    fs::write(meta_path, serde_json::to_string_pretty(metadata)?)?;
    Ok(())
}

fn place_in_shelves(
    shelves: &mut Vec<Shelf>,
    padded_w: u32,
    padded_h: u32,
    sprite_h: u32,
    max_size: u32,
) -> Option<(u32, u32)> {
    for shelf in shelves.iter_mut() {
        if sprite_h <= shelf.height && shelf.width_used + padded_w <= max_size {
            let pos = (shelf.width_used, shelf.y);
            shelf.width_used += padded_w;
            return Some(pos);
        }
    }

    let new_y = shelves.last().map(|s| s.y + s.height).unwrap_or(0);
    if new_y + padded_h <= max_size && padded_w <= max_size {
        shelves.push(Shelf {
            y: new_y,
            height: padded_h,
            width_used: padded_w,
        });
        return Some((0, new_y));
    }

    None
}

fn page_size(shelves: &[Shelf], padding: u32) -> (u32, u32) {
    if shelves.is_empty() {
        return (1, 1);
    }

    let max_width = shelves.iter().map(|s| s.width_used).max().unwrap_or(1);
    let total_height = shelves.last().map(|s| s.y + s.height).unwrap_or(1);

    // Padding sits between sprites, not on the trailing edges.
    let width = max_width.saturating_sub(padding).max(1);
    let height = total_height.saturating_sub(padding).max(1);
    (width, height)
}

fn blit(page: &mut RgbaImage, sprite: &RgbaImage, x: u32, y: u32) {
    for sy in 0..sprite.height() {
        for sx in 0..sprite.width() {
            if x + sx < page.width() && y + sy < page.height() {
                page.put_pixel(x + sx, y + sy, *sprite.get_pixel(sx, sy));
            }
        }
    }
}
