//! Configuration system
//!
//! Surface requests and fixture selection for a conformance run, loadable from
//! TOML or RON files.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::fixture::{FixtureType, STANDARD_FIXTURES};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            ConfigFormat::Ron => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        };

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Reject values that parse but cannot be used; run on every load
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be requested
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Largest bit count accepted for a single channel
const MAX_CHANNEL_BITS: u32 = 32;

/// Window and framebuffer configuration requested for a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Red channel bits
    pub red_bits: u32,
    /// Green channel bits
    pub green_bits: u32,
    /// Blue channel bits
    pub blue_bits: u32,
    /// Alpha channel bits
    pub alpha_bits: u32,
    /// Depth buffer bits
    pub depth_bits: u32,
    /// Stencil buffer bits
    pub stencil_bits: u32,
    /// Request a multisampled config
    pub multisample: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            multisample: false,
        }
    }
}

impl SurfaceConfig {
    /// Set the window size
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the colour channel bits
    pub const fn with_color_bits(mut self, red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        self.red_bits = red;
        self.green_bits = green;
        self.blue_bits = blue;
        self.alpha_bits = alpha;
        self
    }

    /// Set the depth buffer bits
    pub const fn with_depth_bits(mut self, bits: u32) -> Self {
        self.depth_bits = bits;
        self
    }

    /// Set the stencil buffer bits
    pub const fn with_stencil_bits(mut self, bits: u32) -> Self {
        self.stencil_bits = bits;
        self
    }

    /// Enable or disable multisampling
    pub const fn with_multisample(mut self, enabled: bool) -> Self {
        self.multisample = enabled;
        self
    }
}

/// Fixture selection and surface request for a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Fixture types every case is instantiated for
    pub fixtures: Vec<FixtureType>,
    /// Surface requested when a case does not override it
    pub surface: SurfaceConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixtures: STANDARD_FIXTURES.to_vec(),
            surface: SurfaceConfig::default(),
        }
    }
}

impl Config for HarnessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fixtures.is_empty() {
            return Err(ConfigError::Invalid("no fixtures selected".to_string()));
        }
        self.surface.validate()
    }
}

impl Config for SurfaceConfig {
    /// Check the request is something a driver could satisfy
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }

        let channels = [
            ("red", self.red_bits),
            ("green", self.green_bits),
            ("blue", self.blue_bits),
            ("alpha", self.alpha_bits),
            ("depth", self.depth_bits),
            ("stencil", self.stencil_bits),
        ];
        if let Some((name, bits)) = channels.iter().find(|(_, bits)| *bits > MAX_CHANNEL_BITS) {
            return Err(ConfigError::Invalid(format!(
                "{name} bits {bits} exceeds {MAX_CHANNEL_BITS}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{ClientVersion, Renderer, ES3_FIXTURES};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_surface_defaults() {
        let surface = SurfaceConfig::default();
        assert_eq!((surface.width, surface.height), (1280, 720));
        assert_eq!(surface.depth_bits, 24);
        assert!(!surface.multisample);
        assert!(surface.validate().is_ok());
    }

    #[test]
    fn test_surface_builder() {
        let surface = SurfaceConfig::default()
            .with_window_size(128, 128)
            .with_color_bits(8, 8, 8, 8)
            .with_depth_bits(24)
            .with_stencil_bits(0)
            .with_multisample(true);

        assert_eq!(surface.width, 128);
        assert_eq!(surface.stencil_bits, 0);
        assert!(surface.multisample);
    }

    #[test]
    fn test_surface_validation() {
        let zero = SurfaceConfig::default().with_window_size(0, 16);
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let deep = SurfaceConfig::default().with_depth_bits(64);
        let err = deep.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: depth bits 64 exceeds 32");
    }

    #[test]
    fn test_toml_round_trip() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.toml");

        let config = HarnessConfig {
            fixtures: ES3_FIXTURES.to_vec(),
            surface: SurfaceConfig::default().with_window_size(16, 16),
        };
        config.save_to_file(&path).unwrap();

        let loaded = HarnessConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.ron");

        let surface = SurfaceConfig::default().with_stencil_bits(0);
        surface.save_to_file(&path).unwrap();

        assert_eq!(SurfaceConfig::load_from_file(&path).unwrap(), surface);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[[fixtures]]\nclient_version = \"Gles2\"\nrenderer = \"D3D9\"\n\n[surface]\nwidth = 128\n",
        )
        .unwrap();

        let loaded = HarnessConfig::load_from_file(&path).unwrap();
        assert_eq!(
            loaded.fixtures,
            vec![FixtureType::new(ClientVersion::Gles2, Renderer::D3D9)]
        );
        assert_eq!(loaded.surface.width, 128);
        assert_eq!(loaded.surface.height, 720);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();

        let zero_width = dir.path().join("zero.toml");
        std::fs::write(&zero_width, "[surface]\nwidth = 0\n").unwrap();
        let err = HarnessConfig::load_from_file(&zero_width).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: window size 0x720 has a zero dimension"
        );

        let no_fixtures = dir.path().join("empty.ron");
        std::fs::write(&no_fixtures, "(fixtures: [])").unwrap();
        assert!(matches!(
            HarnessConfig::load_from_file(&no_fixtures),
            Err(ConfigError::Invalid(_))
        ));

        let deep = dir.path().join("surface.toml");
        std::fs::write(&deep, "stencil_bits = 64\n").unwrap();
        assert!(matches!(
            SurfaceConfig::load_from_file(&deep),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");

        let err = HarnessConfig::default().save_to_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        assert!(matches!(
            HarnessConfig::load_from_file(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "fixtures = 3").unwrap();

        assert!(matches!(
            HarnessConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
