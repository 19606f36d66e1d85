//! Session and device configuration.
//!
//! Everything is optional in the file form; defaults match the plugin
//! options a capture overlay normally uses.

use crate::geometry::{DeviceProfile, Orientation, Platform, ScreenSize};
use crate::hardware::PreviewOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for capture sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Options passed to the camera plugin.
    pub preview: PreviewOptions,
    /// Orientation to lock the screen to. `None` locks to the session's
    /// own orientation; set `"landscape"` to always lock landscape, as
    /// earlier releases of the capture page did.
    pub lock_orientation: Option<Orientation>,
    /// Upper bound for each hardware call in milliseconds. `None` waits
    /// indefinitely.
    pub hardware_timeout_ms: Option<u64>,
}

impl SessionConfig {
    /// Returns the hardware call bound, if any.
    pub fn hardware_timeout(&self) -> Option<Duration> {
        self.hardware_timeout_ms.map(Duration::from_millis)
    }

    /// Orientation the screen is locked to for a session laid out for
    /// `session`.
    pub fn lock_target(&self, session: Orientation) -> Orientation {
        self.lock_orientation.unwrap_or(session)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.preview.alpha) {
            return Err(ConfigError::InvalidAlpha(self.preview.alpha));
        }
        if self.hardware_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

/// Device description used when no real device is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Platform family; detected from the build target when absent.
    pub platform: Option<Platform>,
    /// Screen width in CSS pixels.
    pub screen_width: u32,
    /// Screen height in CSS pixels.
    pub screen_height: u32,
    /// Whether the device starts in portrait.
    pub portrait: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            platform: None,
            screen_width: 360,
            screen_height: 640,
            portrait: true,
        }
    }
}

impl DeviceConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        Ok(())
    }

    /// Builds the device profile the controller runs against.
    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile::new(
            self.platform.unwrap_or_else(Platform::detect),
            ScreenSize::new(self.screen_width, self.screen_height),
        )
    }

    /// Orientation the device starts in.
    pub fn initial_orientation(&self) -> Orientation {
        Orientation::from_portrait_flag(self.portrait)
    }
}

/// Metrics exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Metrics server port (0 to disable).
    pub port: u16,
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A screen dimension is zero.
    #[error("invalid screen dimensions")]
    InvalidDimensions,
    /// Preview alpha outside 0.0-1.0.
    #[error("invalid preview alpha {0} (must be 0.0-1.0)")]
    InvalidAlpha(f32),
    /// A zero hardware timeout.
    #[error("invalid hardware timeout (must be at least 1 ms)")]
    InvalidTimeout,
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[session]` section.
    #[serde(default)]
    pub session: SessionConfig,
    /// `[device]` section.
    #[serde(default)]
    pub device: DeviceConfig,
    /// `[metrics]` section.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl FileConfig {
    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.session.validate()?;
        config.device.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::CameraFacing;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.session.validate().is_ok());
        assert!(config.device.validate().is_ok());
        assert_eq!(config.session.hardware_timeout(), None);
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = DeviceConfig::default();
        config.screen_width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_alpha_out_of_range_invalid() {
        let mut config = SessionConfig::default();
        config.preview.alpha = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAlpha(_))));
    }

    #[test]
    fn test_lock_target_defaults_to_session() {
        let mut config = SessionConfig::default();
        assert_eq!(
            config.lock_target(Orientation::Portrait),
            Orientation::Portrait
        );
        config.lock_orientation = Some(Orientation::Landscape);
        assert_eq!(
            config.lock_target(Orientation::Portrait),
            Orientation::Landscape
        );
    }

    #[test]
    fn test_parse_toml() {
        let config = FileConfig::from_toml(
            r#"
            [session]
            lock_orientation = "landscape"
            hardware_timeout_ms = 5000

            [session.preview]
            camera = "front"
            alpha = 0.5

            [device]
            platform = "android"
            screen_width = 412
            screen_height = 915
            portrait = false
            "#,
        )
        .unwrap();

        assert_eq!(config.session.lock_orientation, Some(Orientation::Landscape));
        assert_eq!(
            config.session.hardware_timeout(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(config.session.preview.camera, CameraFacing::Front);
        assert!(config.session.preview.to_back);
        assert_eq!(config.device.profile().platform, Platform::Android);
        assert_eq!(config.device.initial_orientation(), Orientation::Landscape);
        assert_eq!(config.metrics.port, 0);
    }

    #[test]
    fn test_parse_rejects_zero_timeout() {
        let result = FileConfig::from_toml("[session]\nhardware_timeout_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }
}
