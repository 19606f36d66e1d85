//! Camera preview service abstraction.
//!
//! The native preview is started behind (or over) the web view with a
//! fixed rectangle, captures a single still on request, and is stopped
//! when the session ends.

use super::{CapturedImage, HardwareError};
use crate::geometry::PreviewGeometry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Notify;

/// Which physical camera the preview uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Rear camera.
    #[default]
    Back,
    /// Front (selfie) camera.
    Front,
}

/// Preview options passed to the plugin alongside the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Camera to open.
    pub camera: CameraFacing,
    /// Render the preview behind the web view.
    pub to_back: bool,
    /// Let the plugin take a photo on tap. The overlay owns the shutter,
    /// so this stays off by default.
    pub tap_photo: bool,
    /// Allow dragging the preview.
    pub preview_drag: bool,
    /// Preview opacity (0.0 to 1.0).
    pub alpha: f32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            camera: CameraFacing::Back,
            to_back: true,
            tap_photo: false,
            preview_drag: false,
            alpha: 1.0,
        }
    }
}

/// Everything the plugin needs to start a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    /// Orientation-corrected preview rectangle.
    pub geometry: PreviewGeometry,
    /// Plugin options.
    pub options: PreviewOptions,
}

/// Trait for camera preview implementations.
///
/// Each call resolves once the plugin has finished; the session controller
/// never issues a call while another one is pending.
#[async_trait]
pub trait CameraService: Send {
    /// Starts the live preview.
    async fn start(&mut self, request: &PreviewRequest) -> Result<(), HardwareError>;

    /// Stops the live preview and releases the camera.
    async fn stop(&mut self) -> Result<(), HardwareError>;

    /// Captures a still image from the running preview.
    async fn capture(&mut self) -> Result<CapturedImage, HardwareError>;
}

/// A call observed by [`MockCamera`].
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCall {
    /// `start` with the request it was given.
    Start(PreviewRequest),
    /// `stop`
    Stop,
    /// `capture`
    Capture,
}

/// Scriptable camera for tests and headless runs.
///
/// Records every call and can be told to fail, hang, or pause on a
/// specific operation.
#[derive(Debug, Default)]
pub struct MockCamera {
    running: bool,
    sequence: u64,
    calls: Vec<CameraCall>,
    payload: Option<Vec<u8>>,
    start_failure: Option<String>,
    hang_start: bool,
    hang_capture: bool,
    hang_stop: bool,
    failing_captures: u32,
    capture_pause: Option<Arc<Notify>>,
    stop_pause: Option<Arc<Notify>>,
    stop_failure: Option<String>,
}

impl MockCamera {
    /// Creates a camera that succeeds at everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `bytes` from every successful capture.
    pub fn with_payload(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(bytes.into());
        self
    }

    /// Makes every start call fail with `reason`.
    pub fn fail_start(mut self, reason: impl Into<String>) -> Self {
        self.start_failure = Some(reason.into());
        self
    }

    /// Makes start calls never resolve.
    pub fn hang_start(mut self) -> Self {
        self.hang_start = true;
        self
    }

    /// Makes capture calls never resolve.
    pub fn hang_capture(mut self) -> Self {
        self.hang_capture = true;
        self
    }

    /// Makes stop calls never resolve.
    pub fn hang_stop(mut self) -> Self {
        self.hang_stop = true;
        self
    }

    /// Makes the next `count` captures fail.
    pub fn fail_captures(mut self, count: u32) -> Self {
        self.failing_captures = count;
        self
    }

    /// Makes every stop call fail with `reason` (the preview still stops).
    pub fn fail_stop(mut self, reason: impl Into<String>) -> Self {
        self.stop_failure = Some(reason.into());
        self
    }

    /// Holds each capture call until the returned handle is notified.
    pub fn pause_capture(&mut self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.capture_pause = Some(Arc::clone(&gate));
        gate
    }

    /// Holds each stop call until the returned handle is notified.
    pub fn pause_stop(&mut self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.stop_pause = Some(Arc::clone(&gate));
        gate
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> &[CameraCall] {
        &self.calls
    }

    /// Returns true while the preview is running.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[async_trait]
impl CameraService for MockCamera {
    async fn start(&mut self, request: &PreviewRequest) -> Result<(), HardwareError> {
        self.calls.push(CameraCall::Start(request.clone()));
        if self.hang_start {
            std::future::pending::<()>().await;
        }
        if let Some(reason) = &self.start_failure {
            return Err(HardwareError::Rejected(reason.clone()));
        }
        if self.running {
            return Err(HardwareError::AlreadyStarted);
        }
        self.running = true;
        self.sequence = 0;
        tracing::info!(geometry = ?request.geometry, "MockCamera preview started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HardwareError> {
        self.calls.push(CameraCall::Stop);
        if self.hang_stop {
            std::future::pending::<()>().await;
        }
        if let Some(gate) = &self.stop_pause {
            gate.notified().await;
        }
        let was_running = std::mem::replace(&mut self.running, false);
        if let Some(reason) = &self.stop_failure {
            return Err(HardwareError::Rejected(reason.clone()));
        }
        if !was_running {
            return Err(HardwareError::NotStarted);
        }
        tracing::info!("MockCamera preview stopped");
        Ok(())
    }

    async fn capture(&mut self) -> Result<CapturedImage, HardwareError> {
        self.calls.push(CameraCall::Capture);
        if self.hang_capture {
            std::future::pending::<()>().await;
        }
        if let Some(gate) = &self.capture_pause {
            gate.notified().await;
        }
        if !self.running {
            return Err(HardwareError::NotStarted);
        }
        if self.failing_captures > 0 {
            self.failing_captures -= 1;
            return Err(HardwareError::Rejected("capture failed".into()));
        }

        self.sequence += 1;
        let bytes = match &self.payload {
            Some(bytes) => bytes.clone(),
            None => format!("mock-frame-{}", self.sequence).into_bytes(),
        };
        Ok(CapturedImage::from_bytes(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PreviewGeometry;

    fn request() -> PreviewRequest {
        PreviewRequest {
            geometry: PreviewGeometry {
                x: 0,
                y: 0,
                width: 360,
                height: 640,
            },
            options: PreviewOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new().with_payload(b"jpeg".to_vec());
        assert!(!camera.is_running());

        camera.start(&request()).await.unwrap();
        assert!(camera.is_running());

        let image = camera.capture().await.unwrap();
        assert_eq!(image.decode().unwrap(), b"jpeg");

        camera.stop().await.unwrap();
        assert!(!camera.is_running());
        assert_eq!(
            camera.calls(),
            &[
                CameraCall::Start(request()),
                CameraCall::Capture,
                CameraCall::Stop
            ]
        );
    }

    #[tokio::test]
    async fn test_capture_without_start() {
        let mut camera = MockCamera::new();
        assert_eq!(
            camera.capture().await.unwrap_err(),
            HardwareError::NotStarted
        );
    }

    #[tokio::test]
    async fn test_scripted_capture_failures() {
        let mut camera = MockCamera::new().fail_captures(2);
        camera.start(&request()).await.unwrap();

        assert!(camera.capture().await.is_err());
        assert!(camera.capture().await.is_err());
        assert!(camera.capture().await.is_ok());
    }

    #[test]
    fn test_default_preview_options() {
        let options = PreviewOptions::default();
        assert_eq!(options.camera, CameraFacing::Back);
        assert!(options.to_back);
        assert!(!options.tap_photo);
        assert!(!options.preview_drag);
        assert_eq!(options.alpha, 1.0);
    }
}
