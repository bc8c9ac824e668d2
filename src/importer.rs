//! Import normalization for sprite-sheet textures.
//!
//! Pixel-art slicing requires a canonical import configuration: multi-sprite
//! mode, point filtering, clamped wrap, no mipmaps, uncompressed storage.
//! [`conform`] forces a settings struct into that configuration and reports
//! whether anything changed; [`normalize`] applies it to a texture on disk
//! and rewrites the sidecar only when a field actually changed, so repeated
//! runs are free.

use crate::meta::{self, MetaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical pixels-per-unit for sliced sheets.
pub const PIXELS_PER_UNIT: f32 = 99.99;

/// Tolerance when comparing pixels-per-unit.
pub const PPU_TOLERANCE: f32 = 0.01;

/// Canonical maximum texture size.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// How sub-sprites are derived from a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpriteMode {
    /// The texture is one sprite
    #[default]
    Single,
    /// The texture carries explicit sub-sprite metadata
    Multiple,
}

/// Semantic texture type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextureType {
    #[default]
    Default,
    Sprite,
}

/// Where the alpha channel comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlphaSource {
    None,
    #[default]
    FromInput,
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FilterMode {
    /// Nearest neighbor - pixel perfect
    Point,
    /// Smooth interpolation
    #[default]
    Bilinear,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
}

/// On-disk compression of the imported texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Compression {
    Uncompressed,
    #[default]
    Compressed,
}

/// Import configuration for one texture.
///
/// Defaults model a freshly imported, never-normalized texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub sprite_mode: SpriteMode,
    pub pixels_per_unit: f32,
    pub texture_type: TextureType,
    pub alpha_source: AlphaSource,
    pub alpha_is_transparency: bool,
    pub filter_mode: FilterMode,
    pub wrap_mode: WrapMode,
    pub mipmaps: bool,
    pub compression: Compression,
    pub max_size: u32,
    pub crunch: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            sprite_mode: SpriteMode::Single,
            pixels_per_unit: 100.0,
            texture_type: TextureType::Default,
            alpha_source: AlphaSource::FromInput,
            alpha_is_transparency: false,
            filter_mode: FilterMode::Bilinear,
            wrap_mode: WrapMode::Repeat,
            mipmaps: true,
            compression: Compression::Compressed,
            max_size: 2048,
            crunch: false,
        }
    }
}

/// Force `settings` into the canonical sprite-sheet configuration.
///
/// Returns `true` if any field changed. Each field is checked and flipped
/// individually; pixels-per-unit uses [`PPU_TOLERANCE`].
pub fn conform(settings: &mut ImportSettings) -> bool {
    let mut changed = false;

    if settings.sprite_mode != SpriteMode::Multiple {
        settings.sprite_mode = SpriteMode::Multiple;
        changed = true;
    }
    if (settings.pixels_per_unit - PIXELS_PER_UNIT).abs() > PPU_TOLERANCE {
        settings.pixels_per_unit = PIXELS_PER_UNIT;
        changed = true;
    }
    if settings.texture_type != TextureType::Sprite {
        settings.texture_type = TextureType::Sprite;
        changed = true;
    }
    if settings.alpha_source != AlphaSource::FromInput {
        settings.alpha_source = AlphaSource::FromInput;
        changed = true;
    }
    if !settings.alpha_is_transparency {
        settings.alpha_is_transparency = true;
        changed = true;
    }
    if settings.filter_mode != FilterMode::Point {
        settings.filter_mode = FilterMode::Point;
        changed = true;
    }
    if settings.wrap_mode != WrapMode::Clamp {
        settings.wrap_mode = WrapMode::Clamp;
        changed = true;
    }
    if settings.mipmaps {
        settings.mipmaps = false;
        changed = true;
    }
    if settings.compression != Compression::Uncompressed {
        settings.compression = Compression::Uncompressed;
        changed = true;
    }
    if settings.max_size != MAX_TEXTURE_SIZE {
        settings.max_size = MAX_TEXTURE_SIZE;
        changed = true;
    }
    if settings.crunch {
        settings.crunch = false;
        changed = true;
    }

    changed
}

/// Normalize a texture's persisted import configuration.
///
/// Loads the sidecar (or defaults), conforms it, and rewrites the sidecar
/// only when something changed. Returns whether a reimport happened.
pub fn normalize(texture: &Path) -> Result<bool, MetaError> {
    let mut texture_meta = meta::load(texture)?;
    let changed = conform(&mut texture_meta.import);
    if changed {
        meta::store(texture, &texture_meta)?;
    }
    Ok(changed)
}
