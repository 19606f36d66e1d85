//! Session controller.

use super::channel::{result_channel, ResultChannel};
use super::state::{ActiveSession, SessionState, SessionStats};
use super::{SessionConfig, SessionError};
use crate::geometry::{preview_geometry, DeviceProfile, Orientation, PreviewGeometry};
use crate::hardware::{
    bounded, CameraService, HardwareError, OrientationService, PreviewRequest,
};
use crate::overlay::{OverlayAction, OverlayManager};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Drives camera sessions from start to teardown.
///
/// All methods take `&mut self`, so hardware calls are strictly
/// sequential: a capture in flight cannot be interrupted, and overlay
/// actions raised meanwhile wait in the action queue until
/// [`run_until_idle`](Self::run_until_idle) picks them up.
pub struct SessionController<C, O> {
    camera: C,
    orientation: O,
    overlay: OverlayManager,
    device: DeviceProfile,
    config: SessionConfig,
    state: SessionState,
    session: Option<ActiveSession>,
    actions_tx: UnboundedSender<OverlayAction>,
    actions_rx: UnboundedReceiver<OverlayAction>,
    stats: SessionStats,
}

impl<C, O> SessionController<C, O>
where
    C: CameraService,
    O: OrientationService,
{
    /// Creates an idle controller.
    pub fn new(
        camera: C,
        orientation: O,
        overlay: OverlayManager,
        device: DeviceProfile,
        config: SessionConfig,
    ) -> Self {
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            camera,
            orientation,
            overlay,
            device,
            config,
            state: SessionState::Idle,
            session: None,
            actions_tx,
            actions_rx,
            stats: SessionStats::default(),
        }
    }

    /// Starts a session laid out for the device's current orientation.
    pub async fn start(&mut self) -> ResultChannel {
        let orientation = Orientation::from_portrait_flag(self.orientation.current_is_portrait());
        self.start_session(orientation).await
    }

    /// Starts a session laid out for `orientation`.
    ///
    /// Returns once the session is running or has failed to start. The
    /// returned channel resolves with the captured image; if the camera
    /// cannot be started, or a session is already active, it carries the
    /// error instead.
    pub async fn start_session(&mut self, orientation: Orientation) -> ResultChannel {
        let (mut sender, channel) = result_channel();

        if self.state != SessionState::Idle {
            self.stats.rejected_starts += 1;
            tracing::warn!(state = %self.state, "Camera session already active");
            sender.fail(SessionError::AlreadyActive);
            return channel;
        }

        // Activations left over from a previous session must not leak in.
        while self.actions_rx.try_recv().is_ok() {}

        self.stats.sessions_started += 1;
        let limit = self.config.hardware_timeout();
        let geometry = preview_geometry(orientation, self.device.platform, self.device.screen);
        let request = PreviewRequest {
            geometry,
            options: self.config.preview.clone(),
        };

        self.transition(SessionState::Starting);
        if let Err(e) = bounded("camera start", limit, self.camera.start(&request)).await {
            // An abandoned start may still bring the preview up later.
            if matches!(e, HardwareError::Timeout { .. }) {
                if let Err(stop) = bounded("camera stop", limit, self.camera.stop()).await {
                    tracing::debug!(error = %stop, "Stop after start timeout failed");
                }
            }
            let error = SessionError::CameraStartFailed(e);
            self.stats.start_failures += 1;
            tracing::warn!(error = %error, "Camera session failed to start");
            sender.fail(error);
            self.transition(SessionState::Idle);
            return channel;
        }

        self.transition(SessionState::Orienting);
        let target = self.config.lock_target(orientation);
        let orientation_locked =
            match bounded("orientation lock", limit, self.orientation.lock(target)).await {
                Ok(()) => true,
                Err(e) => {
                    self.stats.lock_failures += 1;
                    tracing::warn!(
                        error = %SessionError::OrientationLockFailed(e),
                        "Continuing without orientation lock"
                    );
                    false
                }
            };

        self.overlay.mount(orientation, &self.actions_tx);
        self.overlay.hide_host();
        self.session = Some(ActiveSession {
            orientation,
            geometry,
            orientation_locked,
            capture_attempts: 0,
            sender,
        });
        self.transition(SessionState::Running);

        tracing::info!(
            %orientation,
            width = geometry.width,
            height = geometry.height,
            platform = ?self.device.platform,
            "Camera session running"
        );
        channel
    }

    /// Captures a still and ends the session.
    ///
    /// Only valid while running. A failed capture leaves the session
    /// running so the shutter can be pressed again; the error is returned
    /// but never reaches the result channel.
    pub async fn request_capture(&mut self) -> Result<(), SessionError> {
        self.expect_running("capture")?;
        self.transition(SessionState::Capturing);

        let limit = self.config.hardware_timeout();
        let attempt = match self.session.as_mut() {
            Some(session) => {
                session.capture_attempts += 1;
                session.capture_attempts
            }
            None => 0,
        };

        match bounded("camera capture", limit, self.camera.capture()).await {
            Ok(image) => {
                self.stats.captures += 1;
                tracing::info!(attempt, bytes = image.len(), "Picture captured");
                if let Some(session) = self.session.as_mut() {
                    session.sender.succeed(image);
                }
                self.transition(SessionState::Stopping);
                self.teardown().await;
                Ok(())
            }
            Err(e) => {
                let error = SessionError::CaptureFailed(e);
                self.stats.capture_failures += 1;
                tracing::warn!(attempt, error = %error, "Capture failed, session still running");
                self.transition(SessionState::Running);
                Err(error)
            }
        }
    }

    /// Ends the session without a capture. Only valid while running.
    pub async fn cancel_session(&mut self) -> Result<(), SessionError> {
        self.expect_running("cancel")?;
        self.stats.cancellations += 1;
        tracing::info!("Camera session cancelled");
        self.transition(SessionState::Stopping);
        self.teardown().await;
        Ok(())
    }

    /// Routes an overlay activation.
    pub async fn dispatch(&mut self, action: OverlayAction) -> Result<(), SessionError> {
        match action {
            OverlayAction::Capture => self.request_capture().await,
            OverlayAction::Cancel => self.cancel_session().await,
        }
    }

    /// Processes overlay activations until the session ends.
    ///
    /// Returns immediately if no session is running.
    pub async fn run_until_idle(&mut self) {
        while self.state == SessionState::Running {
            let Some(action) = self.actions_rx.recv().await else {
                break;
            };
            if let Err(e) = self.dispatch(action).await {
                tracing::debug!(?action, error = %e, "Overlay action not applied");
            }
        }
    }

    /// Sender overlay elements raise their actions on. Other sources (a
    /// hardware back button, a signal handler) may use it too.
    pub fn action_sender(&self) -> UnboundedSender<OverlayAction> {
        self.actions_tx.clone()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true while the host screen is hidden behind the overlay.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Orientation of the live session.
    pub fn session_orientation(&self) -> Option<Orientation> {
        self.session.as_ref().map(|session| session.orientation)
    }

    /// Preview rectangle of the live session.
    pub fn preview_geometry(&self) -> Option<PreviewGeometry> {
        self.session.as_ref().map(|session| session.geometry)
    }

    /// Returns true if the live session holds an orientation lock.
    pub fn orientation_locked(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.orientation_locked)
    }

    /// Counters accumulated across sessions.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The overlay manager.
    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    /// The camera service.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// The orientation service.
    pub fn orientation_service(&self) -> &O {
        &self.orientation
    }

    fn expect_running(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.state == SessionState::Running {
            Ok(())
        } else {
            tracing::debug!(operation, state = %self.state, "Rejected outside RUNNING");
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Stops the camera and restores the host. Never leaves the overlay
    /// mounted: every failure here is logged and teardown continues.
    async fn teardown(&mut self) {
        let limit = self.config.hardware_timeout();

        if let Err(e) = bounded("camera stop", limit, self.camera.stop()).await {
            self.stats.stop_failures += 1;
            tracing::warn!(error = %SessionError::CameraStopFailed(e), "Tearing down anyway");
        }

        self.overlay.unmount();
        self.overlay.restore_host();

        if let Err(e) = bounded("orientation unlock", limit, self.orientation.unlock()).await {
            self.stats.unlock_failures += 1;
            tracing::warn!(error = %SessionError::OrientationUnlockFailed(e), "Ignoring");
        }

        // Dropping the sender closes the channel if nothing was delivered.
        if let Some(session) = self.session.take() {
            tracing::debug!(
                attempts = session.capture_attempts,
                delivered = session.sender.is_terminated(),
                "Session released"
            );
        }
        self.transition(SessionState::Idle);
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(from = %self.state, to = %next, "Session transition");
        self.state = next;
    }
}

impl<C, O> std::fmt::Debug for SessionController<C, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("device", &self.device)
            .field("overlay", &self.overlay)
            .field("stats", &self.stats)
            .finish()
    }
}
