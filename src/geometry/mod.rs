//! Screen orientation and preview geometry.
//!
//! Native camera previews report their dimensions in a platform-specific
//! frame. The preview rectangle for a session is therefore derived from a
//! lookup table keyed by target orientation and platform family rather than
//! from the raw screen size.

mod orientation;
mod table;

pub use orientation::{class_for, Orientation};
pub use table::{preview_geometry, DeviceProfile, Dimension, Platform, PreviewGeometry, ScreenSize};
