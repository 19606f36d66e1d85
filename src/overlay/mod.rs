//! Transient capture overlay and host screen state.
//!
//! While a session runs, the host screen is hidden so the native preview
//! behind the web view shows through, and three elements are layered on
//! top: a shutter button, a back button and a framing rectangle. The host
//! root and its scroll container are injected rather than looked up, so
//! the overlay can be driven without a real UI tree.

mod element;
mod host;
mod manager;

pub use element::{ActionTrigger, ElementKind, OverlayAction, OverlayElement};
pub use host::{
    ElementId, OverlaySurface, SharedStyle, SharedSurface, StyleSnapshot, StyleTarget,
    OVERFLOW_Y, VISIBILITY,
};
pub use manager::{HostScreen, OverlayManager};
