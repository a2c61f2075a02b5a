//! # Conformance
//!
//! Host-side support for a GPU conformance suite. Nothing here talks to a
//! driver; the crate models the rules the suite checks a driver against.
//!
//! ## Features
//!
//! - **Fixtures**: every case is instantiated per client version and renderer
//! - **Configuration**: surface requests and fixture selection from TOML or RON
//! - **Pixel math**: unpack alignment, row pitch and expected sample colours
//! - **Format rules**: channel bit depths, sRGB validation and depth/stencil support
//! - **Texture completeness**: mip chain checks and the incomplete-texture colour
//! - **Buffer data**: size and range validation of buffer data stores
//!
//! ## Quick Start
//!
//! ```rust
//! use conformance::fixture::{instantiate, STANDARD_FIXTURES};
//! use conformance::pixel::{image_size, PixelFormat, PixelType, UnpackAlignment};
//!
//! let cases: Vec<String> = instantiate(&["UnpackAlignment"], &STANDARD_FIXTURES)
//!     .map(|(name, _)| name)
//!     .collect();
//! assert_eq!(cases, vec!["ES2_D3D11/UnpackAlignment", "ES2_D3D9/UnpackAlignment"]);
//!
//! let alignment = UnpackAlignment::new(8).unwrap();
//! let size = image_size(7, 2, PixelFormat::Rgb, PixelType::UnsignedByte, alignment).unwrap();
//! assert_eq!(size, 24 + 21);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod fixture;
pub mod format;
pub mod pixel;
pub mod texture;

pub use buffer::ShadowBuffer;
pub use config::{Config, ConfigError, HarnessConfig, SurfaceConfig};
pub use error::{GlError, GlResult};
pub use fixture::{ClientVersion, FixtureType, Renderer, ES3_FIXTURES, STANDARD_FIXTURES};
pub use format::{ChannelBits, ColorFormat, ExtensionSet, SrgbSupport};
pub use pixel::{PixelError, PixelFormat, PixelStore, PixelType, Rgba8, UnpackAlignment};
pub use texture::{MinFilter, Texture2D};
