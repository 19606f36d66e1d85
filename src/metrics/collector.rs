//! Metrics collection and registry.

use crate::hardware::{CameraService, OrientationService};
use crate::session::{SessionController, SessionState};
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of controller state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Controller state.
    pub state: SessionState,
    /// Overlay elements currently mounted.
    pub overlay_elements: usize,
    /// Sessions started.
    pub sessions_started: u64,
    /// Starts rejected because a session was active.
    pub rejected_starts: u64,
    /// Camera start failures.
    pub start_failures: u64,
    /// Orientation lock failures.
    pub lock_failures: u64,
    /// Successful captures.
    pub captures: u64,
    /// Failed capture attempts.
    pub capture_failures: u64,
    /// Cancelled sessions.
    pub cancellations: u64,
    /// Camera stop failures.
    pub stop_failures: u64,
    /// Orientation unlock failures.
    pub unlock_failures: u64,
}

/// Prometheus metrics registry for session monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Lifecycle metrics
    session_state: IntGauge,
    overlay_elements: IntGauge,
    sessions_started: IntCounter,
    sessions_rejected: IntCounter,
    cancellations: IntCounter,

    // Hardware metrics
    captures: IntCounter,
    capture_failures: IntCounter,
    start_failures: IntCounter,
    stop_failures: IntCounter,
    lock_failures: IntCounter,
    unlock_failures: IntCounter,
}

/// Advances a counter to `target`; counters never go backwards.
fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all session metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let session_state = IntGauge::new(
            "camera_overlay_session_state",
            "Current session state (0=idle, 1=starting, 2=orienting, 3=running, 4=capturing, 5=stopping)",
        )?;
        let overlay_elements = IntGauge::new(
            "camera_overlay_overlay_elements",
            "Number of overlay elements currently mounted",
        )?;
        let sessions_started = IntCounter::new(
            "camera_overlay_sessions_started_total",
            "Total number of camera sessions started",
        )?;
        let sessions_rejected = IntCounter::new(
            "camera_overlay_sessions_rejected_total",
            "Session starts rejected because a session was already active",
        )?;
        let cancellations = IntCounter::new(
            "camera_overlay_cancellations_total",
            "Total number of sessions cancelled from the overlay",
        )?;

        let captures = IntCounter::new(
            "camera_overlay_captures_total",
            "Total number of successful captures",
        )?;
        let capture_failures = IntCounter::new(
            "camera_overlay_capture_failures_total",
            "Total number of failed capture attempts",
        )?;
        let start_failures = IntCounter::new(
            "camera_overlay_start_failures_total",
            "Total number of camera start failures",
        )?;
        let stop_failures = IntCounter::new(
            "camera_overlay_stop_failures_total",
            "Total number of camera stop failures",
        )?;
        let lock_failures = IntCounter::new(
            "camera_overlay_lock_failures_total",
            "Total number of orientation lock failures",
        )?;
        let unlock_failures = IntCounter::new(
            "camera_overlay_unlock_failures_total",
            "Total number of orientation unlock failures",
        )?;

        registry.register(Box::new(session_state.clone()))?;
        registry.register(Box::new(overlay_elements.clone()))?;
        registry.register(Box::new(sessions_started.clone()))?;
        registry.register(Box::new(sessions_rejected.clone()))?;
        registry.register(Box::new(cancellations.clone()))?;
        registry.register(Box::new(captures.clone()))?;
        registry.register(Box::new(capture_failures.clone()))?;
        registry.register(Box::new(start_failures.clone()))?;
        registry.register(Box::new(stop_failures.clone()))?;
        registry.register(Box::new(lock_failures.clone()))?;
        registry.register(Box::new(unlock_failures.clone()))?;

        Ok(Self {
            registry,
            session_state,
            overlay_elements,
            sessions_started,
            sessions_rejected,
            cancellations,
            captures,
            capture_failures,
            start_failures,
            stop_failures,
            lock_failures,
            unlock_failures,
        })
    }

    /// Updates all metrics from a snapshot of controller state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.session_state.set(snapshot.state.code());
        self.overlay_elements.set(snapshot.overlay_elements as i64);

        advance(&self.sessions_started, snapshot.sessions_started);
        advance(&self.sessions_rejected, snapshot.rejected_starts);
        advance(&self.cancellations, snapshot.cancellations);
        advance(&self.captures, snapshot.captures);
        advance(&self.capture_failures, snapshot.capture_failures);
        advance(&self.start_failures, snapshot.start_failures);
        advance(&self.stop_failures, snapshot.stop_failures);
        advance(&self.lock_failures, snapshot.lock_failures);
        advance(&self.unlock_failures, snapshot.unlock_failures);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current state of a controller.
    pub fn from_controller<C, O>(controller: &SessionController<C, O>) -> Self
    where
        C: CameraService,
        O: OrientationService,
    {
        let stats = controller.stats();
        Self {
            state: controller.state(),
            overlay_elements: controller.overlay().mounted_len(),
            sessions_started: stats.sessions_started,
            rejected_starts: stats.rejected_starts,
            start_failures: stats.start_failures,
            lock_failures: stats.lock_failures,
            captures: stats.captures,
            capture_failures: stats.capture_failures,
            cancellations: stats.cancellations,
            stop_failures: stats.stop_failures,
            unlock_failures: stats.unlock_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DeviceProfile, Orientation, Platform, ScreenSize};
    use crate::hardware::{MockCamera, MockOrientation};
    use crate::overlay::{HostScreen, OverlayManager, SharedStyle, SharedSurface};
    use crate::session::SessionConfig;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            state: SessionState::Running,
            overlay_elements: 3,
            sessions_started: 2,
            captures: 1,
            capture_failures: 4,
            ..Default::default()
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("camera_overlay_session_state 3"));
        assert!(output.contains("camera_overlay_overlay_elements 3"));
        assert!(output.contains("camera_overlay_sessions_started_total 2"));
        assert!(output.contains("camera_overlay_capture_failures_total 4"));

        // Counters do not move backwards on a stale snapshot.
        registry.update(&MetricsSnapshot::default());
        let output = registry.encode().unwrap();
        assert!(output.contains("camera_overlay_sessions_started_total 2"));
        assert!(output.contains("camera_overlay_session_state 0"));
    }

    #[tokio::test]
    async fn test_snapshot_from_controller() {
        let overlay = OverlayManager::new(
            SharedSurface::new(),
            HostScreen::new(SharedStyle::new(), SharedStyle::new()),
        );
        let mut controller = SessionController::new(
            MockCamera::new().fail_captures(1),
            MockOrientation::default(),
            overlay,
            DeviceProfile::new(Platform::Ios, ScreenSize::new(375, 812)),
            SessionConfig::default(),
        );

        let _channel = controller.start_session(Orientation::Portrait).await;
        let _ = controller.request_capture().await;

        let snapshot = MetricsSnapshot::from_controller(&controller);
        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(snapshot.overlay_elements, 3);
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.capture_failures, 1);
    }
}
