//! Camera session lifecycle.
//!
//! The controller walks one session at a time through
//!
//! ```text
//! IDLE → STARTING → ORIENTING → RUNNING ⇄ CAPTURING
//!                                  │          │
//!                                  └→ STOPPING ←┘ → IDLE
//! ```
//!
//! awaiting each hardware call before issuing the next. Only a failed
//! camera start is reported to the consumer; every other hardware failure
//! is logged and absorbed so the overlay can always be dismissed.

mod channel;
mod config;
mod controller;
mod state;


pub use channel::{result_channel, ResultChannel, ResultSender};
pub use config::{ConfigError, DeviceConfig, FileConfig, MetricsConfig, SessionConfig};
pub use controller::SessionController;
pub use state::{SessionState, SessionStats};

use crate::hardware::HardwareError;
use thiserror::Error;

/// Errors produced by a capture session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Camera start failed; the session never ran.
    #[error("camera failed to start: {0}")]
    CameraStartFailed(HardwareError),
    /// Orientation lock failed; the session runs unlocked.
    #[error("screen orientation lock failed: {0}")]
    OrientationLockFailed(HardwareError),
    /// A capture attempt failed; the session keeps running.
    #[error("capture failed: {0}")]
    CaptureFailed(HardwareError),
    /// Camera stop failed; teardown went ahead.
    #[error("camera failed to stop: {0}")]
    CameraStopFailed(HardwareError),
    /// Orientation unlock failed.
    #[error("screen orientation unlock failed: {0}")]
    OrientationUnlockFailed(HardwareError),
    /// A session was requested while another was active.
    #[error("a camera session is already active")]
    AlreadyActive,
    /// Capture or cancel outside RUNNING.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// Rejected operation.
        operation: &'static str,
        /// State at the time.
        state: SessionState,
    },
    /// The session ended without a capture.
    #[error("session ended without a capture")]
    Cancelled,
}

impl SessionError {
    /// Returns true if the error ends the session attempt.
    ///
    /// Everything else is logged and the session carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CameraStartFailed(_) | Self::AlreadyActive)
    }

    /// Returns true if the underlying hardware call timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::CameraStartFailed(HardwareError::Timeout { .. })
                | Self::OrientationLockFailed(HardwareError::Timeout { .. })
                | Self::CaptureFailed(HardwareError::Timeout { .. })
                | Self::CameraStopFailed(HardwareError::Timeout { .. })
                | Self::OrientationUnlockFailed(HardwareError::Timeout { .. })
        )
    }
}
