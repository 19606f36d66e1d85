//! Preview geometry lookup table.

use super::Orientation;
use serde::{Deserialize, Serialize};

/// Platform family of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android devices.
    Android,
    /// iOS devices.
    Ios,
    /// Anything else (desktop builds, browsers).
    Other,
}

impl Platform {
    /// Detects the platform family of the build target.
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Other,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::detect()
    }
}

/// Physical screen size as reported by the host, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Screen width.
    pub width: u32,
    /// Screen height.
    pub height: u32,
}

impl ScreenSize {
    /// Creates a screen size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reads one dimension.
    #[inline]
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::ScreenWidth => self.width,
            Dimension::ScreenHeight => self.height,
        }
    }
}

/// The device a controller runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Platform family.
    pub platform: Platform,
    /// Screen size.
    pub screen: ScreenSize,
}

impl DeviceProfile {
    /// Creates a device profile.
    pub fn new(platform: Platform, screen: ScreenSize) -> Self {
        Self { platform, screen }
    }
}

/// Screen dimension a preview axis is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// `screen.width`
    ScreenWidth,
    /// `screen.height`
    ScreenHeight,
}

/// Rectangle handed to the native camera preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewGeometry {
    /// Left offset.
    pub x: u32,
    /// Top offset.
    pub y: u32,
    /// Preview width.
    pub width: u32,
    /// Preview height.
    pub height: u32,
}

use Dimension::{ScreenHeight, ScreenWidth};

/// (orientation, platform) → (width source, height source).
///
/// Android reports landscape previews in screen coordinates; the other
/// families expect the axes swapped.
const PREVIEW_TABLE: [((Orientation, Platform), (Dimension, Dimension)); 6] = [
    ((Orientation::Portrait, Platform::Android), (ScreenWidth, ScreenHeight)),
    ((Orientation::Portrait, Platform::Ios), (ScreenWidth, ScreenHeight)),
    ((Orientation::Portrait, Platform::Other), (ScreenWidth, ScreenHeight)),
    ((Orientation::Landscape, Platform::Android), (ScreenWidth, ScreenHeight)),
    ((Orientation::Landscape, Platform::Ios), (ScreenHeight, ScreenWidth)),
    ((Orientation::Landscape, Platform::Other), (ScreenHeight, ScreenWidth)),
];

fn sources(orientation: Orientation, platform: Platform) -> (Dimension, Dimension) {
    PREVIEW_TABLE
        .iter()
        .find(|(key, _)| *key == (orientation, platform))
        .map(|(_, sources)| *sources)
        // Table is exhaustive over both enums.
        .unwrap_or((ScreenWidth, ScreenHeight))
}

/// Computes the preview rectangle for a session.
pub fn preview_geometry(
    orientation: Orientation,
    platform: Platform,
    screen: ScreenSize,
) -> PreviewGeometry {
    let (width_source, height_source) = sources(orientation, platform);
    PreviewGeometry {
        x: 0,
        y: 0,
        width: screen.get(width_source),
        height: screen.get(height_source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_PLATFORMS: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Other];

    #[test]
    fn test_table_is_exhaustive() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            for platform in ALL_PLATFORMS {
                assert!(PREVIEW_TABLE
                    .iter()
                    .any(|(key, _)| *key == (orientation, platform)));
            }
        }
    }

    #[test]
    fn test_android_landscape_uses_screen_width() {
        let geometry = preview_geometry(
            Orientation::Landscape,
            Platform::Android,
            ScreenSize::new(360, 640),
        );
        assert_eq!(geometry.width, 360);
        assert_eq!(geometry.height, 640);
        assert_eq!((geometry.x, geometry.y), (0, 0));
    }

    #[test]
    fn test_ios_landscape_swaps_axes() {
        let geometry =
            preview_geometry(Orientation::Landscape, Platform::Ios, ScreenSize::new(375, 812));
        assert_eq!(geometry.width, 812);
        assert_eq!(geometry.height, 375);
    }

    proptest! {
        #[test]
        fn portrait_is_unswapped_on_every_platform(
            width in 1u32..10_000,
            height in 1u32..10_000,
            platform in prop::sample::select(ALL_PLATFORMS.to_vec()),
        ) {
            let geometry = preview_geometry(
                Orientation::Portrait,
                platform,
                ScreenSize::new(width, height),
            );
            prop_assert_eq!(geometry.width, width);
            prop_assert_eq!(geometry.height, height);
        }

        #[test]
        fn landscape_swaps_except_on_android(
            width in 1u32..10_000,
            height in 1u32..10_000,
            platform in prop::sample::select(ALL_PLATFORMS.to_vec()),
        ) {
            let screen = ScreenSize::new(width, height);
            let portrait = preview_geometry(Orientation::Portrait, platform, screen);
            let landscape = preview_geometry(Orientation::Landscape, platform, screen);
            if platform == Platform::Android {
                prop_assert_eq!(landscape, portrait);
            } else {
                prop_assert_eq!(landscape.width, portrait.height);
                prop_assert_eq!(landscape.height, portrait.width);
            }
        }
    }
}
