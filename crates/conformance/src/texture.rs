//! Texture completeness
//!
//! Reference model of a 2D texture's mip chain. Sampling an incomplete
//! texture yields opaque black instead of texel data.

use std::collections::BTreeMap;

use crate::error::{GlError, GlResult};
use crate::pixel::Rgba8;

/// Largest texture dimension accepted
pub const MAX_TEXTURE_SIZE: u32 = 16384;

/// Highest mip level index accepted
pub const MAX_LEVEL: u32 = MAX_TEXTURE_SIZE.trailing_zeros();

/// Colour sampled from an incomplete texture
pub const INCOMPLETE_TEXTURE_COLOR: Rgba8 = Rgba8::BLACK;

/// Minification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MinFilter {
    /// `GL_NEAREST`
    Nearest,
    /// `GL_LINEAR`
    Linear,
    /// `GL_NEAREST_MIPMAP_NEAREST`
    NearestMipmapNearest,
    /// `GL_LINEAR_MIPMAP_NEAREST`
    LinearMipmapNearest,
    /// `GL_NEAREST_MIPMAP_LINEAR`, the initial filter of every texture
    #[default]
    NearestMipmapLinear,
    /// `GL_LINEAR_MIPMAP_LINEAR`
    LinearMipmapLinear,
}

impl MinFilter {
    /// Whether the filter reads levels below the base level
    pub const fn uses_mipmaps(self) -> bool {
        !matches!(self, Self::Nearest | Self::Linear)
    }
}

/// Rectangle written by one sub-image update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgba8,
}

impl Region {
    const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x - self.x < self.width && y >= self.y && y - self.y < self.height
    }
}

/// One defined mip level
///
/// Texels are never materialised: a level is its fill colour overlaid with
/// the sub-image regions written since, latest on top.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MipLevel {
    width: u32,
    height: u32,
    fill: Rgba8,
    regions: Vec<Region>,
}

impl MipLevel {
    const fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            fill: color,
            regions: Vec::new(),
        }
    }

    fn write(&mut self, region: Region) {
        if region.width == 0 || region.height == 0 {
            return;
        }
        if region.width == self.width && region.height == self.height {
            self.fill = region.color;
            self.regions.clear();
            return;
        }
        self.regions.push(region);
    }

    fn texel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let color = self
            .regions
            .iter()
            .rev()
            .find(|region| region.contains(x, y))
            .map_or(self.fill, |region| region.color);
        Some(color)
    }
}

/// 2D texture with an explicit mip chain
#[derive(Debug, Clone, Default)]
pub struct Texture2D {
    levels: BTreeMap<u32, MipLevel>,
    min_filter: MinFilter,
}

impl Texture2D {
    /// Create a texture with no levels defined
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a level filled with a single colour
    pub fn tex_image(&mut self, level: u32, width: u32, height: u32, color: Rgba8) -> GlResult<()> {
        if level > MAX_LEVEL {
            return Err(GlError::InvalidValue);
        }
        let limit = MAX_TEXTURE_SIZE >> level;
        if width > limit || height > limit {
            return Err(GlError::InvalidValue);
        }

        self.levels.insert(level, MipLevel::filled(width, height, color));
        log::trace!("Defined level {} as {}x{}", level, width, height);
        Ok(())
    }

    /// Overwrite a region of an existing level with a single colour
    pub fn tex_sub_image(
        &mut self,
        level: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgba8,
    ) -> GlResult<()> {
        let mip = self.levels.get_mut(&level).ok_or(GlError::InvalidOperation)?;

        let fits = |offset: u32, extent: u32, size: u32| {
            offset.checked_add(extent).is_some_and(|end| end <= size)
        };
        if !fits(x, width, mip.width) || !fits(y, height, mip.height) {
            return Err(GlError::InvalidValue);
        }

        mip.write(Region {
            x,
            y,
            width,
            height,
            color,
        });
        Ok(())
    }

    /// Set the minification filter
    pub fn set_min_filter(&mut self, filter: MinFilter) {
        self.min_filter = filter;
    }

    /// Current minification filter
    pub const fn min_filter(&self) -> MinFilter {
        self.min_filter
    }

    /// Size of a defined level
    pub fn level_size(&self, level: u32) -> Option<(u32, u32)> {
        self.levels.get(&level).map(|mip| (mip.width, mip.height))
    }

    /// Whether sampling reads real texel data
    ///
    /// The base level must be non-empty. Mipmapped filters additionally need
    /// every level down to 1x1, each half the size of the one above.
    pub fn is_complete(&self) -> bool {
        let Some(base) = self.levels.get(&0) else {
            return false;
        };
        if base.width == 0 || base.height == 0 {
            return false;
        }
        if !self.min_filter.uses_mipmaps() {
            return true;
        }

        let top = base.width.max(base.height).ilog2();
        (1..=top).all(|level| {
            let expected = ((base.width >> level).max(1), (base.height >> level).max(1));
            self.level_size(level) == Some(expected)
        })
    }

    /// Colour sampled at a base level texel
    ///
    /// Coordinates are clamped to the edge of the base level.
    pub fn sample(&self, x: u32, y: u32) -> Rgba8 {
        if !self.is_complete() {
            return INCOMPLETE_TEXTURE_COLOR;
        }
        self.levels
            .get(&0)
            .and_then(|base| base.texel(x.min(base.width - 1), y.min(base.height - 1)))
            .unwrap_or(INCOMPLETE_TEXTURE_COLOR)
    }
}
