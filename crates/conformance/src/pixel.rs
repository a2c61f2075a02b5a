//! Pixel transfer rules
//!
//! Client memory layout of texture uploads: bytes per pixel for each
//! format/type pair and how `GL_UNPACK_ALIGNMENT` pads every row.

use std::fmt;

use thiserror::Error;

use crate::error::GlError;

/// Client pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Red, green, blue, alpha
    Rgba,
    /// Red, green, blue
    Rgb,
    /// Luminance and alpha
    LuminanceAlpha,
    /// Luminance only
    Luminance,
    /// Alpha only
    Alpha,
}

impl PixelFormat {
    /// Number of components per pixel
    pub const fn components(self) -> u32 {
        match self {
            Self::Rgba => 4,
            Self::Rgb => 3,
            Self::LuminanceAlpha => 2,
            Self::Luminance | Self::Alpha => 1,
        }
    }

    /// Whether sampling yields colour in the RGB channels
    pub const fn has_rgb(self) -> bool {
        !matches!(self, Self::Alpha)
    }
}

/// Client pixel component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// One byte per component
    UnsignedByte,
    /// RGBA packed 4-4-4-4 into 16 bits
    UnsignedShort4444,
    /// RGBA packed 5-5-5-1 into 16 bits
    UnsignedShort5551,
    /// RGB packed 5-6-5 into 16 bits
    UnsignedShort565,
}

/// Invalid pixel transfer parameters
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelError {
    /// Packed type used with a format it does not pack
    #[error("pixel type {pixel_type:?} cannot be used with format {format:?}")]
    InvalidCombination {
        /// Requested format
        format: PixelFormat,
        /// Requested type
        pixel_type: PixelType,
    },

    /// Alignment other than 1, 2, 4 or 8
    #[error("unpack alignment {0} is not 1, 2, 4 or 8")]
    InvalidAlignment(i32),

    /// Byte count does not fit in 32 bits
    #[error("{width}x{height} image size overflows")]
    Overflow {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

impl From<PixelError> for GlError {
    fn from(err: PixelError) -> Self {
        match err {
            PixelError::InvalidCombination { .. } => Self::InvalidOperation,
            PixelError::InvalidAlignment(_) | PixelError::Overflow { .. } => Self::InvalidValue,
        }
    }
}

/// Bytes occupied by one pixel
pub const fn pixel_size(format: PixelFormat, pixel_type: PixelType) -> Result<u32, PixelError> {
    match (pixel_type, format) {
        (PixelType::UnsignedByte, _) => Ok(format.components()),
        (PixelType::UnsignedShort4444 | PixelType::UnsignedShort5551, PixelFormat::Rgba)
        | (PixelType::UnsignedShort565, PixelFormat::Rgb) => Ok(2),
        _ => Err(PixelError::InvalidCombination { format, pixel_type }),
    }
}

/// Row alignment of client pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnpackAlignment(u32);

impl UnpackAlignment {
    /// Validate an alignment value
    pub const fn new(value: i32) -> Result<Self, PixelError> {
        match value {
            1 | 2 | 4 | 8 => Ok(Self(value as u32)),
            _ => Err(PixelError::InvalidAlignment(value)),
        }
    }

    /// Alignment in bytes
    pub const fn bytes(self) -> u32 {
        self.0
    }
}

impl Default for UnpackAlignment {
    fn default() -> Self {
        Self(4)
    }
}

impl fmt::Display for UnpackAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bytes from the start of one row to the start of the next
pub const fn row_pitch(
    width: u32,
    format: PixelFormat,
    pixel_type: PixelType,
    alignment: UnpackAlignment,
) -> Result<u32, PixelError> {
    let size = match pixel_size(format, pixel_type) {
        Ok(size) => size,
        Err(err) => return Err(err),
    };
    match row_bytes(width, size, alignment) {
        Some((_, pitch)) => Ok(pitch),
        None => Err(PixelError::Overflow { width, height: 1 }),
    }
}

/// Bytes read for a full image; the last row is not padded
pub const fn image_size(
    width: u32,
    height: u32,
    format: PixelFormat,
    pixel_type: PixelType,
    alignment: UnpackAlignment,
) -> Result<u32, PixelError> {
    let size = match pixel_size(format, pixel_type) {
        Ok(size) => size,
        Err(err) => return Err(err),
    };
    if width == 0 || height == 0 {
        return Ok(0);
    }
    let overflow = PixelError::Overflow { width, height };
    let Some((unpadded, pitch)) = row_bytes(width, size, alignment) else {
        return Err(overflow);
    };
    let Some(padded_rows) = pitch.checked_mul(height - 1) else {
        return Err(overflow);
    };
    match padded_rows.checked_add(unpadded) {
        Some(total) => Ok(total),
        None => Err(overflow),
    }
}

/// Unpadded and padded byte length of one row
const fn row_bytes(width: u32, size: u32, alignment: UnpackAlignment) -> Option<(u32, u32)> {
    let Some(unpadded) = width.checked_mul(size) else {
        return None;
    };
    match unpadded.checked_next_multiple_of(alignment.bytes()) {
        Some(pitch) => Some((unpadded, pitch)),
        None => None,
    }
}

/// Pixel storage state of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelStore {
    unpack_alignment: UnpackAlignment,
}

impl PixelStore {
    /// Set `GL_UNPACK_ALIGNMENT`; rejected values leave the state unchanged
    pub fn set_unpack_alignment(&mut self, value: i32) -> Result<(), GlError> {
        self.unpack_alignment = UnpackAlignment::new(value)?;
        log::trace!("Unpack alignment set to {}", self.unpack_alignment);
        Ok(())
    }

    /// Current `GL_UNPACK_ALIGNMENT`
    pub const fn unpack_alignment(&self) -> UnpackAlignment {
        self.unpack_alignment
    }
}

/// 8-bit RGBA colour as read back from a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green
    pub const GREEN: Self = Self::new(0, 255, 0, 255);

    /// Create a colour
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read a colour from the first four bytes of a readback buffer
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, a, ..] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Every channel within `tolerance` of `other`
    pub const fn is_near(&self, other: &Self, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Colour sampled from a texel whose bytes are all set
///
/// Alpha-only textures sample as black with full alpha.
pub const fn expected_sample(format: PixelFormat) -> Rgba8 {
    if format.has_rgb() {
        Rgba8::WHITE
    } else {
        Rgba8::BLACK
    }
}
