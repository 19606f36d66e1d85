//! Screen orientation service abstraction.

use super::HardwareError;
use crate::geometry::Orientation;
use async_trait::async_trait;

/// Trait for screen orientation implementations.
#[async_trait]
pub trait OrientationService: Send {
    /// Locks the screen to `target`.
    async fn lock(&mut self, target: Orientation) -> Result<(), HardwareError>;

    /// Releases any orientation lock.
    async fn unlock(&mut self) -> Result<(), HardwareError>;

    /// Returns true if the device is currently held in portrait.
    fn current_is_portrait(&self) -> bool;
}

/// A call observed by [`MockOrientation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationCall {
    /// `lock` with its target.
    Lock(Orientation),
    /// `unlock`
    Unlock,
}

/// Scriptable orientation service.
#[derive(Debug)]
pub struct MockOrientation {
    current: Orientation,
    locked: Option<Orientation>,
    calls: Vec<OrientationCall>,
    lock_failure: Option<String>,
    unlock_failure: Option<String>,
}

impl MockOrientation {
    /// Creates a service reporting `current` as the device orientation.
    pub fn new(current: Orientation) -> Self {
        Self {
            current,
            locked: None,
            calls: Vec::new(),
            lock_failure: None,
            unlock_failure: None,
        }
    }

    /// Makes every lock call fail with `reason`.
    pub fn fail_lock(mut self, reason: impl Into<String>) -> Self {
        self.lock_failure = Some(reason.into());
        self
    }

    /// Makes every unlock call fail with `reason`.
    pub fn fail_unlock(mut self, reason: impl Into<String>) -> Self {
        self.unlock_failure = Some(reason.into());
        self
    }

    /// Current lock, if any.
    pub fn locked(&self) -> Option<Orientation> {
        self.locked
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> &[OrientationCall] {
        &self.calls
    }
}

impl Default for MockOrientation {
    fn default() -> Self {
        Self::new(Orientation::Portrait)
    }
}

#[async_trait]
impl OrientationService for MockOrientation {
    async fn lock(&mut self, target: Orientation) -> Result<(), HardwareError> {
        self.calls.push(OrientationCall::Lock(target));
        if let Some(reason) = &self.lock_failure {
            return Err(HardwareError::Rejected(reason.clone()));
        }
        self.locked = Some(target);
        self.current = target;
        Ok(())
    }

    async fn unlock(&mut self) -> Result<(), HardwareError> {
        self.calls.push(OrientationCall::Unlock);
        if let Some(reason) = &self.unlock_failure {
            return Err(HardwareError::Rejected(reason.clone()));
        }
        self.locked = None;
        Ok(())
    }

    fn current_is_portrait(&self) -> bool {
        self.current.is_portrait()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lock_and_unlock() {
        let mut service = MockOrientation::new(Orientation::Portrait);
        assert!(service.current_is_portrait());

        service.lock(Orientation::Landscape).await.unwrap();
        assert_eq!(service.locked(), Some(Orientation::Landscape));
        assert!(!service.current_is_portrait());

        service.unlock().await.unwrap();
        assert_eq!(service.locked(), None);
        assert_eq!(
            service.calls(),
            &[
                OrientationCall::Lock(Orientation::Landscape),
                OrientationCall::Unlock
            ]
        );
    }

    #[tokio::test]
    async fn test_scripted_lock_failure() {
        let mut service = MockOrientation::default().fail_lock("not supported");
        assert_eq!(
            service.lock(Orientation::Landscape).await,
            Err(HardwareError::Rejected("not supported".into()))
        );
        assert_eq!(service.locked(), None);
    }
}
