//! Prometheus metrics for capture sessions.
//!
//! This module exposes the session controller's counters in Prometheus
//! format, optionally served over HTTP.
//!
//! # Metrics Exposed
//!
//! ## Lifecycle Metrics
//! - `camera_overlay_session_state` - Current state (0=idle .. 5=stopping)
//! - `camera_overlay_overlay_elements` - Overlay elements currently mounted
//! - `camera_overlay_sessions_started_total` - Sessions started
//! - `camera_overlay_sessions_rejected_total` - Starts rejected while active
//! - `camera_overlay_cancellations_total` - Sessions cancelled
//!
//! ## Hardware Metrics
//! - `camera_overlay_captures_total` - Successful captures
//! - `camera_overlay_capture_failures_total` - Failed capture attempts
//! - `camera_overlay_start_failures_total` - Camera start failures
//! - `camera_overlay_stop_failures_total` - Camera stop failures
//! - `camera_overlay_lock_failures_total` - Orientation lock failures
//! - `camera_overlay_unlock_failures_total` - Orientation unlock failures
//!
//! # Example
//!
//! ```no_run
//! use camera_overlay::metrics::{MetricsRegistry, MetricsSnapshot};
//! use camera_overlay::session::SessionState;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     state: SessionState::Running,
//!     overlay_elements: 3,
//!     sessions_started: 1,
//!     ..Default::default()
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
