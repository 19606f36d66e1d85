//! Session states and per-session bookkeeping.

use super::channel::ResultSender;
use crate::geometry::{Orientation, PreviewGeometry};
use std::fmt;

/// Lifecycle state of the session controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session; overlay absent, host visible.
    #[default]
    Idle,
    /// Camera start in flight.
    Starting,
    /// Camera running; orientation lock in flight.
    Orienting,
    /// Overlay mounted, host hidden; accepts capture or cancel.
    Running,
    /// Capture in flight; overlay still mounted.
    Capturing,
    /// Camera stop in flight; teardown follows.
    Stopping,
}

impl SessionState {
    /// Returns true while the host screen is hidden behind the overlay.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running | Self::Capturing | Self::Stopping)
    }

    /// Numeric code exported as a metric.
    pub fn code(self) -> i64 {
        match self {
            Self::Idle => 0,
            Self::Starting => 1,
            Self::Orienting => 2,
            Self::Running => 3,
            Self::Capturing => 4,
            Self::Stopping => 5,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "IDLE",
            Self::Starting => "STARTING",
            Self::Orienting => "ORIENTING",
            Self::Running => "RUNNING",
            Self::Capturing => "CAPTURING",
            Self::Stopping => "STOPPING",
        })
    }
}

/// The one live session.
#[derive(Debug)]
pub(crate) struct ActiveSession {
    pub orientation: Orientation,
    pub geometry: PreviewGeometry,
    pub orientation_locked: bool,
    pub capture_attempts: u32,
    pub sender: ResultSender,
}

/// Counters accumulated across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sessions requested while idle.
    pub sessions_started: u64,
    /// Camera start failures (including timeouts).
    pub start_failures: u64,
    /// Orientation lock failures.
    pub lock_failures: u64,
    /// Successful captures.
    pub captures: u64,
    /// Failed capture attempts.
    pub capture_failures: u64,
    /// Sessions cancelled from the overlay.
    pub cancellations: u64,
    /// Camera stop failures.
    pub stop_failures: u64,
    /// Orientation unlock failures.
    pub unlock_failures: u64,
    /// Start requests rejected because a session was active.
    pub rejected_starts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_states() {
        assert!(!SessionState::Idle.is_running());
        assert!(!SessionState::Starting.is_running());
        assert!(!SessionState::Orienting.is_running());
        assert!(SessionState::Running.is_running());
        assert!(SessionState::Capturing.is_running());
        assert!(SessionState::Stopping.is_running());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Capturing.to_string(), "CAPTURING");
    }
}
