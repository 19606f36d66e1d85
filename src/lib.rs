//! Camera Overlay Library
//!
//! Runs a single camera capture session on a mobile screen: the native
//! preview is started with orientation-correct dimensions, the screen
//! orientation is locked, a transient overlay (shutter, back button,
//! framing rectangle) replaces the host screen, and the captured image is
//! handed back through a one-shot result channel.
//!
//! # Architecture
//!
//! ```text
//! consumer → SessionController ──→ CameraService / OrientationService
//!                 │      ↑
//!                 ↓      │ OverlayAction (shutter, back)
//!           OverlayManager ──→ OverlaySurface, host StyleTargets
//!                 │
//!           ResultChannel → consumer
//! ```
//!
//! # Design Principles
//!
//! - **One session at a time**: every hardware call is awaited before the next
//! - **Dismissable**: the overlay can always be torn down; only a failed
//!   camera start reaches the consumer, everything else is logged
//! - **Injected host**: the host root and scroll container are passed in,
//!   and their prior styles are restored exactly
//!
//! # Example
//!
//! ```no_run
//! use camera_overlay::{
//!     geometry::{DeviceProfile, Orientation, Platform, ScreenSize},
//!     hardware::{MockCamera, MockOrientation},
//!     overlay::{ElementKind, HostScreen, OverlayManager, SharedStyle, SharedSurface},
//!     session::{SessionConfig, SessionController},
//! };
//!
//! # async fn run() {
//! let surface = SharedSurface::new();
//! let overlay = OverlayManager::new(
//!     surface.clone(),
//!     HostScreen::new(SharedStyle::new(), SharedStyle::new()),
//! );
//! let mut controller = SessionController::new(
//!     MockCamera::new(),
//!     MockOrientation::new(Orientation::Portrait),
//!     overlay,
//!     DeviceProfile::new(Platform::Android, ScreenSize::new(360, 640)),
//!     SessionConfig::default(),
//! );
//!
//! let channel = controller.start().await;
//! surface.activate(ElementKind::Shutter);
//! controller.run_until_idle().await;
//!
//! let image = channel.recv().await.unwrap();
//! println!("{}", image.data_url("image/png"));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod geometry;
pub mod hardware;
pub mod metrics;
pub mod overlay;
pub mod session;

// Re-export commonly used types at crate root
pub use geometry::{class_for, DeviceProfile, Orientation, Platform, PreviewGeometry, ScreenSize};
pub use hardware::{CameraService, CapturedImage, HardwareError, OrientationService};
pub use overlay::{HostScreen, OverlayAction, OverlayManager};
pub use session::{ResultChannel, SessionConfig, SessionController, SessionError, SessionState};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
