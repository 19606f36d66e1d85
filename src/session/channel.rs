//! One-shot capture result channel.
//!
//! Each session gets a fresh channel carrying exactly one terminal event:
//! the captured image, or the error that prevented the session from
//! starting. A value sent before the consumer polls is buffered.

use super::SessionError;
use crate::hardware::CapturedImage;
use tokio::sync::oneshot;

type Outcome = Result<CapturedImage, SessionError>;

/// Creates a connected sender/receiver pair.
pub fn result_channel() -> (ResultSender, ResultChannel) {
    let (tx, rx) = oneshot::channel();
    (
        ResultSender { tx: Some(tx) },
        ResultChannel {
            rx,
            delivered: false,
        },
    )
}

/// Controller side of a result channel.
#[derive(Debug)]
pub struct ResultSender {
    tx: Option<oneshot::Sender<Outcome>>,
}

impl ResultSender {
    /// Delivers the captured image. Returns false if an event was already
    /// sent or the consumer is gone.
    pub fn succeed(&mut self, image: CapturedImage) -> bool {
        self.send(Ok(image))
    }

    /// Delivers a terminal error. Returns false if an event was already
    /// sent or the consumer is gone.
    pub fn fail(&mut self, error: SessionError) -> bool {
        self.send(Err(error))
    }

    /// Returns true once a terminal event has been sent.
    pub fn is_terminated(&self) -> bool {
        self.tx.is_none()
    }

    fn send(&mut self, outcome: Outcome) -> bool {
        match self.tx.take() {
            Some(tx) => {
                let delivered = tx.send(outcome).is_ok();
                if !delivered {
                    tracing::debug!("Capture result dropped: consumer went away");
                }
                delivered
            }
            None => {
                tracing::warn!("Session already delivered its result, ignoring");
                false
            }
        }
    }
}

/// Consumer side of a result channel.
///
/// If the session ends without a capture (cancelled from the overlay) the
/// channel resolves to [`SessionError::Cancelled`].
#[derive(Debug)]
pub struct ResultChannel {
    rx: oneshot::Receiver<Outcome>,
    delivered: bool,
}

impl ResultChannel {
    /// Waits for the session's terminal event.
    pub async fn recv(self) -> Result<CapturedImage, SessionError> {
        self.rx.await.unwrap_or(Err(SessionError::Cancelled))
    }

    /// Returns the terminal event if it is available.
    ///
    /// Yields `Some` at most once; `None` means no event yet (or the event
    /// was already taken).
    pub fn try_recv(&mut self) -> Option<Result<CapturedImage, SessionError>> {
        if self.delivered {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(SessionError::Cancelled),
        };
        self.delivered = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffered_value_reaches_late_consumer() {
        let (mut tx, rx) = result_channel();
        assert!(tx.succeed(CapturedImage::from_base64("QQ==")));
        assert!(tx.is_terminated());

        let image = rx.recv().await.unwrap();
        assert_eq!(image.as_base64(), "QQ==");
    }

    #[test]
    fn test_only_first_event_is_delivered() {
        let (mut tx, mut rx) = result_channel();
        assert!(tx.fail(SessionError::AlreadyActive));
        assert!(!tx.succeed(CapturedImage::from_base64("QQ==")));

        assert!(matches!(rx.try_recv(), Some(Err(SessionError::AlreadyActive))));
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_dropped_sender_means_cancelled() {
        let (tx, mut rx) = result_channel();
        assert!(rx.try_recv().is_none());
        drop(tx);
        assert!(matches!(rx.try_recv(), Some(Err(SessionError::Cancelled))));

        let (tx, rx) = result_channel();
        drop(tx);
        assert!(matches!(rx.recv().await, Err(SessionError::Cancelled)));
    }
}
