//! Device orientation and the layout class derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation a capture session is laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Maps the host platform's "is portrait" query onto an orientation.
    pub fn from_portrait_flag(is_portrait: bool) -> Self {
        if is_portrait {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }

    /// Parses an orientation type string as reported by screen orientation
    /// APIs (`"landscape-primary"`, `"portrait-secondary"`, ...).
    ///
    /// Anything that does not mention landscape is treated as portrait.
    pub fn parse_lenient(value: &str) -> Self {
        if value.to_ascii_lowercase().contains("landscape") {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Returns the layout class attached to overlay elements.
    #[inline]
    pub fn class_name(self) -> &'static str {
        class_for(self)
    }

    /// Returns true for [`Orientation::Portrait`].
    #[inline]
    pub fn is_portrait(self) -> bool {
        matches!(self, Self::Portrait)
    }
}

/// Layout class for overlay elements created under `orientation`.
///
/// Every overlay element and style rule keys off this string, so it is
/// derived in exactly one place.
pub fn class_for(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_for() {
        assert_eq!(class_for(Orientation::Portrait), "portrait");
        assert_eq!(class_for(Orientation::Landscape), "landscape");
        assert_eq!(Orientation::Landscape.class_name(), "landscape");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(
            Orientation::parse_lenient("landscape-primary"),
            Orientation::Landscape
        );
        assert_eq!(
            Orientation::parse_lenient("LANDSCAPE"),
            Orientation::Landscape
        );
        assert_eq!(
            Orientation::parse_lenient("portrait-secondary"),
            Orientation::Portrait
        );
        assert_eq!(Orientation::parse_lenient("any"), Orientation::Portrait);
    }

    #[test]
    fn test_from_portrait_flag() {
        assert_eq!(Orientation::from_portrait_flag(true), Orientation::Portrait);
        assert_eq!(
            Orientation::from_portrait_flag(false),
            Orientation::Landscape
        );
    }
}
