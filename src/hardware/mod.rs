//! Hardware capability interfaces.
//!
//! The camera preview plugin and the screen orientation plugin are treated
//! as black-box asynchronous services. This module defines the traits the
//! session controller drives, mock implementations for tests and headless
//! runs, and the bounded-call helper used to keep a hung plugin from
//! stalling a session forever.

mod camera;
mod image;
mod orientation;

pub use camera::{CameraCall, CameraFacing, CameraService, MockCamera, PreviewOptions, PreviewRequest};
pub use image::{CapturedImage, ImageError};
pub use orientation::{MockOrientation, OrientationCall, OrientationService};

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by hardware services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    /// The plugin reported an error.
    #[error("plugin rejected the call: {0}")]
    Rejected(String),
    /// Stop or capture without a running preview.
    #[error("camera preview is not running")]
    NotStarted,
    /// Start while a preview is already running.
    #[error("camera preview is already running")]
    AlreadyStarted,
    /// The call did not resolve within the configured bound.
    #[error("{operation} did not complete within {after:?}")]
    Timeout {
        /// Call that timed out, e.g. `"camera start"`.
        operation: &'static str,
        /// Bound that was exceeded.
        after: Duration,
    },
}

/// Awaits a hardware call, optionally bounded by `limit`.
///
/// With `limit == None` the call is awaited indefinitely.
pub async fn bounded<T, F>(
    operation: &'static str,
    limit: Option<Duration>,
    call: F,
) -> Result<T, HardwareError>
where
    F: Future<Output = Result<T, HardwareError>>,
{
    match limit {
        Some(after) => match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, ?after, "Hardware call timed out");
                Err(HardwareError::Timeout { operation, after })
            }
        },
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: Result<(), _> = bounded(
            "camera start",
            Some(Duration::from_millis(500)),
            std::future::pending(),
        )
        .await;
        assert_eq!(
            result,
            Err(HardwareError::Timeout {
                operation: "camera start",
                after: Duration::from_millis(500),
            })
        );
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded("camera stop", None, async { Ok::<_, HardwareError>(7) }).await;
        assert_eq!(result, Ok(7));

        let result: Result<(), _> = bounded("camera stop", Some(Duration::from_secs(1)), async {
            Err(HardwareError::NotStarted)
        })
        .await;
        assert_eq!(result, Err(HardwareError::NotStarted));
    }
}
