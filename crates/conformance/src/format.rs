//! Format tables and extension-dependent format rules
//!
//! Minimum channel depths of the renderable colour formats, sRGB validation
//! and depth/stencil format availability.

use std::collections::HashSet;

use bitflags::bitflags;

use crate::error::{GlError, GlResult};
use crate::fixture::ClientVersion;

/// sRGB texture and renderbuffer formats
pub const EXT_SRGB: &str = "GL_EXT_sRGB";
/// Depth textures
pub const ANGLE_DEPTH_TEXTURE: &str = "GL_ANGLE_depth_texture";
/// Packed 24/8 depth-stencil
pub const OES_PACKED_DEPTH_STENCIL: &str = "GL_OES_packed_depth_stencil";
/// 32-bit depth renderbuffers
pub const OES_DEPTH32: &str = "GL_OES_depth32";
/// Immutable texture storage
pub const EXT_TEXTURE_STORAGE: &str = "GL_EXT_texture_storage";
/// BGRA8 textures
pub const EXT_TEXTURE_FORMAT_BGRA8888: &str = "GL_EXT_texture_format_BGRA8888";
/// RGB8 and RGBA8 renderbuffers
pub const OES_RGB8_RGBA8: &str = "GL_OES_rgb8_rgba8";

bitflags! {
    /// Channels present in a format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        /// Red channel
        const RED = 1 << 0;
        /// Green channel
        const GREEN = 1 << 1;
        /// Blue channel
        const BLUE = 1 << 2;
        /// Alpha channel
        const ALPHA = 1 << 3;
        /// Depth channel
        const DEPTH = 1 << 4;
        /// Stencil channel
        const STENCIL = 1 << 5;
        /// Red, green and blue
        const RGB = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        /// Red, green, blue and alpha
        const RGBA = Self::RGB.bits() | Self::ALPHA.bits();
    }
}

/// Bit depth of every channel of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelBits {
    /// Red bits
    pub red: u32,
    /// Green bits
    pub green: u32,
    /// Blue bits
    pub blue: u32,
    /// Alpha bits
    pub alpha: u32,
    /// Depth bits
    pub depth: u32,
    /// Stencil bits
    pub stencil: u32,
}

impl ChannelBits {
    /// Colour-only bit depths
    pub const fn color(red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            depth: 0,
            stencil: 0,
        }
    }

    /// Channels with a non-zero depth
    pub fn channels(&self) -> Channels {
        [
            (Channels::RED, self.red),
            (Channels::GREEN, self.green),
            (Channels::BLUE, self.blue),
            (Channels::ALPHA, self.alpha),
            (Channels::DEPTH, self.depth),
            (Channels::STENCIL, self.stencil),
        ]
        .into_iter()
        .filter(|(_, bits)| *bits > 0)
        .fold(Channels::empty(), |set, (channel, _)| set | channel)
    }

    /// Whether every channel meets the minimum request
    ///
    /// A minimum of zero means the channel must be absent.
    pub const fn satisfies(&self, minimum: &Self) -> bool {
        satisfies_minimum(self.red, minimum.red)
            && satisfies_minimum(self.green, minimum.green)
            && satisfies_minimum(self.blue, minimum.blue)
            && satisfies_minimum(self.alpha, minimum.alpha)
            && satisfies_minimum(self.depth, minimum.depth)
            && satisfies_minimum(self.stencil, minimum.stencil)
    }
}

/// Single channel check: zero must be matched exactly, anything else is a floor
pub const fn satisfies_minimum(actual: u32, minimum: u32) -> bool {
    if minimum == 0 {
        actual == 0
    } else {
        actual >= minimum
    }
}

/// Sized colour formats a framebuffer can be backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// `GL_RGBA4`
    Rgba4,
    /// `GL_RGB565`
    Rgb565,
    /// `GL_RGB8_OES`
    Rgb8,
    /// `GL_BGRA8_EXT`
    Bgra8,
    /// `GL_RGBA8_OES`
    Rgba8,
    /// `GL_SRGB8_ALPHA8_EXT`
    Srgb8Alpha8,
}

impl ColorFormat {
    /// Every colour format in the table
    pub const ALL: [Self; 6] = [
        Self::Rgba4,
        Self::Rgb565,
        Self::Rgb8,
        Self::Bgra8,
        Self::Rgba8,
        Self::Srgb8Alpha8,
    ];

    /// Smallest channel depths a framebuffer of this format may report
    pub const fn minimum_bits(self) -> ChannelBits {
        match self {
            Self::Rgba4 => ChannelBits::color(4, 4, 4, 4),
            Self::Rgb565 => ChannelBits::color(5, 6, 5, 0),
            Self::Rgb8 => ChannelBits::color(8, 8, 8, 0),
            Self::Bgra8 | Self::Rgba8 | Self::Srgb8Alpha8 => ChannelBits::color(8, 8, 8, 8),
        }
    }

    /// Extension needed on an ES2 context, if any
    pub const fn required_extension(self) -> Option<&'static str> {
        match self {
            Self::Rgba4 | Self::Rgb565 => None,
            Self::Rgb8 | Self::Rgba8 => Some(OES_RGB8_RGBA8),
            Self::Bgra8 => Some(EXT_TEXTURE_FORMAT_BGRA8888),
            Self::Srgb8Alpha8 => Some(EXT_SRGB),
        }
    }
}

/// Extensions advertised by a context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    names: HashSet<String>,
}

impl ExtensionSet {
    /// Parse the space separated `GL_EXTENSIONS` string
    pub fn parse(extensions: &str) -> Self {
        Self {
            names: extensions.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Whether the named extension is advertised
    ///
    /// Names match whole tokens, so `GL_EXT_sRGB` does not match
    /// `GL_EXT_sRGB_write_control`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of advertised extensions
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no extension is advertised
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|name| name.as_ref().to_owned()).collect(),
        }
    }
}

/// Unsized sRGB formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrgbFormat {
    /// `GL_SRGB_EXT`
    Srgb,
    /// `GL_SRGB_ALPHA_EXT`
    SrgbAlpha,
}

/// Colour encoding reported for a framebuffer attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorEncoding {
    /// `GL_LINEAR`
    Linear,
    /// `GL_SRGB_EXT`
    Srgb,
}

/// sRGB validation rules for one context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrgbSupport {
    supported: bool,
    client_version: ClientVersion,
}

impl SrgbSupport {
    /// Derive the rules from the advertised extensions and client version
    pub fn detect(extensions: &ExtensionSet, client_version: ClientVersion) -> Self {
        let supported = extensions.contains(EXT_SRGB) || client_version == ClientVersion::Gles3;
        log::debug!("sRGB support for {:?}: {}", client_version, supported);
        Self {
            supported,
            client_version,
        }
    }

    /// Whether sRGB formats are available at all
    pub const fn is_supported(&self) -> bool {
        self.supported
    }

    /// Outcome of uploading or updating an sRGB texture
    pub const fn tex_image(&self, _format: SrgbFormat) -> GlResult<()> {
        if self.supported {
            Ok(())
        } else {
            Err(GlError::InvalidEnum)
        }
    }

    /// Outcome of generating mipmaps for an sRGB texture
    pub const fn generate_mipmap(&self, format: SrgbFormat) -> GlResult<()> {
        if !self.supported {
            return Err(GlError::InvalidEnum);
        }
        match (format, self.client_version) {
            (SrgbFormat::SrgbAlpha, ClientVersion::Gles3) => Ok(()),
            _ => Err(GlError::InvalidOperation),
        }
    }

    /// Outcome of allocating `GL_SRGB8_ALPHA8` renderbuffer storage
    pub const fn renderbuffer_storage(&self) -> GlResult<()> {
        if self.supported {
            Ok(())
        } else {
            Err(GlError::InvalidEnum)
        }
    }

    /// Encoding reported for an sRGB colour attachment
    pub const fn attachment_color_encoding(&self) -> GlResult<ColorEncoding> {
        if self.supported {
            Ok(ColorEncoding::Srgb)
        } else {
            Err(GlError::InvalidEnum)
        }
    }
}

/// Decode an sRGB encoded value in `[0, 1]` to linear
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear value in `[0, 1]` as sRGB
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Decode an 8-bit sRGB channel to an 8-bit linear channel
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn decode_srgb8(value: u8) -> u8 {
    (srgb_to_linear(f32::from(value) / 255.0) * 255.0).round() as u8
}

/// Depth and stencil formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthStencilFormat {
    /// `GL_DEPTH_COMPONENT16`
    DepthComponent16,
    /// `GL_DEPTH_COMPONENT32_OES`
    DepthComponent32,
    /// `GL_DEPTH24_STENCIL8_OES`
    Depth24Stencil8,
}

impl DepthStencilFormat {
    /// Channel depths of the format
    pub const fn bits(self) -> ChannelBits {
        let depth = match self {
            Self::DepthComponent16 => 16,
            Self::DepthComponent32 => 32,
            Self::Depth24Stencil8 => 24,
        };
        let stencil = match self {
            Self::Depth24Stencil8 => 8,
            Self::DepthComponent16 | Self::DepthComponent32 => 0,
        };
        ChannelBits {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 0,
            depth,
            stencil,
        }
    }
}

/// Depth/stencil availability for one context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilSupport {
    depth_texture: bool,
    depth32: bool,
    packed_depth_stencil: bool,
    texture_storage: bool,
}

impl DepthStencilSupport {
    /// Derive availability from the advertised extensions
    pub fn detect(extensions: &ExtensionSet) -> Self {
        Self {
            depth_texture: extensions.contains(ANGLE_DEPTH_TEXTURE),
            depth32: extensions.contains(OES_DEPTH32),
            packed_depth_stencil: extensions.contains(OES_PACKED_DEPTH_STENCIL),
            texture_storage: extensions.contains(EXT_TEXTURE_STORAGE),
        }
    }

    /// Whether a texture of this format can be created
    pub const fn texture(&self, format: DepthStencilFormat) -> bool {
        match format {
            DepthStencilFormat::DepthComponent16 | DepthStencilFormat::DepthComponent32 => {
                self.depth_texture
            }
            DepthStencilFormat::Depth24Stencil8 => self.depth_texture && self.packed_depth_stencil,
        }
    }

    /// Whether immutable texture storage of this format can be allocated
    ///
    /// `None` when the context has no immutable storage at all.
    pub const fn texture_storage(&self, format: DepthStencilFormat) -> Option<bool> {
        if self.texture_storage {
            Some(self.texture(format))
        } else {
            None
        }
    }

    /// Whether a renderbuffer of this format can be allocated
    pub const fn renderbuffer(&self, format: DepthStencilFormat) -> bool {
        match format {
            DepthStencilFormat::DepthComponent16 => true,
            DepthStencilFormat::DepthComponent32 => self.depth32,
            DepthStencilFormat::Depth24Stencil8 => self.packed_depth_stencil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_framebuffer_minimum_bits() {
        assert_eq!(ColorFormat::Rgb565.minimum_bits(), ChannelBits::color(5, 6, 5, 0));
        assert_eq!(ColorFormat::Bgra8.minimum_bits(), ChannelBits::color(8, 8, 8, 8));
        assert_eq!(ColorFormat::Rgb8.minimum_bits().channels(), Channels::RGB);
        assert_eq!(ColorFormat::Rgba4.minimum_bits().channels(), Channels::RGBA);
    }

    #[test]
    fn test_satisfies_minimum() {
        assert!(satisfies_minimum(0, 0));
        assert!(!satisfies_minimum(8, 0));
        assert!(satisfies_minimum(8, 4));
        assert!(!satisfies_minimum(4, 5));
    }

    #[test]
    fn test_backing_format_may_exceed_request() {
        // RGBA4 is commonly backed by an 8-bit format
        let reported = ChannelBits::color(8, 8, 8, 8);
        assert!(reported.satisfies(&ColorFormat::Rgba4.minimum_bits()));
        // but an RGB format must not report alpha
        assert!(!reported.satisfies(&ColorFormat::Rgb8.minimum_bits()));
        assert!(ChannelBits::color(8, 8, 8, 0).satisfies(&ColorFormat::Rgb565.minimum_bits()));
    }

    #[test]
    fn test_required_extensions() {
        let required: Vec<_> = ColorFormat::ALL
            .iter()
            .filter_map(|format| format.required_extension())
            .collect();
        assert!(required.contains(&EXT_SRGB));
        assert_eq!(ColorFormat::Rgba4.required_extension(), None);
    }

    #[test]
    fn test_extension_set_matches_whole_tokens() {
        let extensions = ExtensionSet::parse("GL_EXT_sRGB_write_control  GL_OES_rgb8_rgba8\n");
        assert_eq!(extensions.len(), 2);
        assert!(extensions.contains(OES_RGB8_RGBA8));
        assert!(!extensions.contains(EXT_SRGB));
        assert!(ExtensionSet::parse("").is_empty());
    }

    #[test]
    fn test_srgb_unsupported() {
        let support = SrgbSupport::detect(&ExtensionSet::default(), ClientVersion::Gles2);
        assert!(!support.is_supported());
        assert_eq!(support.tex_image(SrgbFormat::Srgb), Err(GlError::InvalidEnum));
        assert_eq!(support.generate_mipmap(SrgbFormat::Srgb), Err(GlError::InvalidEnum));
        assert_eq!(support.generate_mipmap(SrgbFormat::SrgbAlpha), Err(GlError::InvalidEnum));
        assert_eq!(support.renderbuffer_storage(), Err(GlError::InvalidEnum));
        assert_eq!(support.attachment_color_encoding(), Err(GlError::InvalidEnum));
    }

    #[test]
    fn test_srgb_with_extension_on_es2() {
        let extensions: ExtensionSet = [EXT_SRGB].into_iter().collect();
        let support = SrgbSupport::detect(&extensions, ClientVersion::Gles2);

        assert_eq!(support.tex_image(SrgbFormat::SrgbAlpha), Ok(()));
        assert_eq!(support.generate_mipmap(SrgbFormat::Srgb), Err(GlError::InvalidOperation));
        assert_eq!(
            support.generate_mipmap(SrgbFormat::SrgbAlpha),
            Err(GlError::InvalidOperation)
        );
        assert_eq!(support.attachment_color_encoding(), Ok(ColorEncoding::Srgb));
    }

    #[test]
    fn test_srgb_on_es3_without_extension() {
        let support = SrgbSupport::detect(&ExtensionSet::default(), ClientVersion::Gles3);

        assert!(support.is_supported());
        assert_eq!(support.generate_mipmap(SrgbFormat::Srgb), Err(GlError::InvalidOperation));
        assert_eq!(support.generate_mipmap(SrgbFormat::SrgbAlpha), Ok(()));
        assert_eq!(support.renderbuffer_storage(), Ok(()));
    }

    #[test]
    fn test_srgb_transfer_functions() {
        assert_relative_eq!(srgb_to_linear(0.0), 0.0);
        assert_relative_eq!(srgb_to_linear(1.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(srgb_to_linear(0.5), 0.214_041, epsilon = 1e-5);
        assert_relative_eq!(linear_to_srgb(0.214_041), 0.5, epsilon = 1e-5);
        assert_relative_eq!(linear_to_srgb(0.002), 0.025_84, epsilon = 1e-6);
    }

    #[test]
    fn test_decode_srgb8() {
        assert_eq!(decode_srgb8(0), 0);
        assert_eq!(decode_srgb8(255), 255);
        assert_eq!(decode_srgb8(128), 55);
    }

    #[test]
    fn test_depth_texture_support() {
        let none = DepthStencilSupport::detect(&ExtensionSet::default());
        assert!(!none.texture(DepthStencilFormat::DepthComponent16));
        assert_eq!(none.texture_storage(DepthStencilFormat::DepthComponent32), None);

        let depth: ExtensionSet = [ANGLE_DEPTH_TEXTURE, EXT_TEXTURE_STORAGE].into_iter().collect();
        let support = DepthStencilSupport::detect(&depth);
        assert!(support.texture(DepthStencilFormat::DepthComponent32));
        assert_eq!(support.texture_storage(DepthStencilFormat::DepthComponent16), Some(true));
    }

    #[test]
    fn test_depth32_renderbuffer_needs_oes_depth32() {
        let none = DepthStencilSupport::detect(&ExtensionSet::default());
        assert!(none.renderbuffer(DepthStencilFormat::DepthComponent16));
        assert!(!none.renderbuffer(DepthStencilFormat::DepthComponent32));

        let depth_texture: ExtensionSet = [ANGLE_DEPTH_TEXTURE].into_iter().collect();
        let support = DepthStencilSupport::detect(&depth_texture);
        assert!(support.texture(DepthStencilFormat::DepthComponent32));
        assert!(!support.renderbuffer(DepthStencilFormat::DepthComponent32));

        let depth32: ExtensionSet = [OES_DEPTH32].into_iter().collect();
        let support = DepthStencilSupport::detect(&depth32);
        assert!(support.renderbuffer(DepthStencilFormat::DepthComponent32));
        assert!(!support.texture(DepthStencilFormat::DepthComponent32));
    }

    #[test]
    fn test_packed_depth_stencil_support() {
        let packed_only: ExtensionSet = [OES_PACKED_DEPTH_STENCIL].into_iter().collect();
        let support = DepthStencilSupport::detect(&packed_only);
        assert!(support.renderbuffer(DepthStencilFormat::Depth24Stencil8));
        assert!(!support.texture(DepthStencilFormat::Depth24Stencil8));

        let both: ExtensionSet = [OES_PACKED_DEPTH_STENCIL, ANGLE_DEPTH_TEXTURE]
            .into_iter()
            .collect();
        assert!(DepthStencilSupport::detect(&both).texture(DepthStencilFormat::Depth24Stencil8));
    }

    #[test]
    fn test_depth_stencil_bits() {
        let bits = DepthStencilFormat::Depth24Stencil8.bits();
        assert_eq!(bits.channels(), Channels::DEPTH | Channels::STENCIL);
        assert_eq!(DepthStencilFormat::DepthComponent16.bits().depth, 16);
    }
}
