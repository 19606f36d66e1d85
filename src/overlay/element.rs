//! Overlay elements and the actions they trigger.

use crate::geometry::{class_for, Orientation};
use tokio::sync::mpsc::UnboundedSender;

/// User action raised by an overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Shutter pressed.
    Capture,
    /// Back pressed.
    Cancel,
}

/// The three elements making up the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// Shutter button.
    Shutter,
    /// Back button.
    Back,
    /// Framing rectangle.
    Frame,
}

impl ElementKind {
    /// All kinds, in mount order.
    pub const ALL: [ElementKind; 3] = [Self::Shutter, Self::Back, Self::Frame];

    /// Base style class of the element.
    pub fn base_class(self) -> &'static str {
        match self {
            Self::Shutter => "camera-shoot-btn",
            Self::Back => "camera-back-btn",
            Self::Frame => "camera-rect",
        }
    }

    /// Action raised when the element is activated, if any.
    pub fn action(self) -> Option<OverlayAction> {
        match self {
            Self::Shutter => Some(OverlayAction::Capture),
            Self::Back => Some(OverlayAction::Cancel),
            Self::Frame => None,
        }
    }
}

/// Sends an element's action to the session controller.
#[derive(Debug, Clone)]
pub struct ActionTrigger {
    action: OverlayAction,
    tx: UnboundedSender<OverlayAction>,
}

impl ActionTrigger {
    /// Creates a trigger raising `action` on `tx`.
    pub fn new(action: OverlayAction, tx: UnboundedSender<OverlayAction>) -> Self {
        Self { action, tx }
    }

    /// Action this trigger raises.
    pub fn action(&self) -> OverlayAction {
        self.action
    }

    /// Raises the action. Returns false if the controller is gone.
    pub fn fire(&self) -> bool {
        self.tx.send(self.action).is_ok()
    }
}

/// An element to attach to the overlay surface.
#[derive(Debug, Clone)]
pub struct OverlayElement {
    kind: ElementKind,
    class_name: String,
    trigger: Option<ActionTrigger>,
}

impl OverlayElement {
    /// Builds an element of `kind` laid out for `orientation`.
    pub fn new(
        kind: ElementKind,
        orientation: Orientation,
        actions: &UnboundedSender<OverlayAction>,
    ) -> Self {
        Self {
            kind,
            class_name: format!("{} {}", kind.base_class(), class_for(orientation)),
            trigger: kind
                .action()
                .map(|action| ActionTrigger::new(action, actions.clone())),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Full class attribute, e.g. `"camera-shoot-btn portrait"`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Activation handler, absent for the framing rectangle.
    pub fn trigger(&self) -> Option<&ActionTrigger> {
        self.trigger.as_ref()
    }

    /// Simulates a click. Returns true if an action was raised.
    pub fn activate(&self) -> bool {
        self.trigger.as_ref().map_or(false, ActionTrigger::fire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_element_classes() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let shutter = OverlayElement::new(ElementKind::Shutter, Orientation::Landscape, &tx);
        assert_eq!(shutter.class_name(), "camera-shoot-btn landscape");

        let frame = OverlayElement::new(ElementKind::Frame, Orientation::Portrait, &tx);
        assert_eq!(frame.class_name(), "camera-rect portrait");
        assert!(frame.trigger().is_none());
    }

    #[test]
    fn test_activation_raises_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let back = OverlayElement::new(ElementKind::Back, Orientation::Portrait, &tx);
        let frame = OverlayElement::new(ElementKind::Frame, Orientation::Portrait, &tx);

        assert!(back.activate());
        assert!(!frame.activate());
        assert_eq!(rx.try_recv().unwrap(), OverlayAction::Cancel);
        assert!(rx.try_recv().is_err());
    }
}
