//! Mounting the overlay and hiding the host screen.

use super::{
    ElementId, ElementKind, OverlayAction, OverlayElement, OverlaySurface, StyleSnapshot,
    StyleTarget, OVERFLOW_Y, VISIBILITY,
};
use crate::geometry::Orientation;
use tokio::sync::mpsc::UnboundedSender;

/// The host screen the overlay replaces while a session runs.
pub struct HostScreen {
    /// Application root; hidden while the preview shows.
    pub root: Box<dyn StyleTarget>,
    /// Scroll container of the hosting page; scrolling is locked while
    /// the preview shows.
    pub scroll_container: Box<dyn StyleTarget>,
}

impl HostScreen {
    /// Bundles the injected host elements.
    pub fn new(
        root: impl StyleTarget + 'static,
        scroll_container: impl StyleTarget + 'static,
    ) -> Self {
        Self {
            root: Box::new(root),
            scroll_container: Box::new(scroll_container),
        }
    }
}

/// Owns the overlay elements and the host screen's hidden state.
pub struct OverlayManager {
    surface: Box<dyn OverlaySurface>,
    host: HostScreen,
    mounted: Vec<(ElementKind, ElementId)>,
    mounted_orientation: Option<Orientation>,
    saved: Option<StyleSnapshot>,
}

impl OverlayManager {
    /// Creates a manager attaching elements to `surface`.
    pub fn new(surface: impl OverlaySurface + 'static, host: HostScreen) -> Self {
        Self {
            surface: Box::new(surface),
            host,
            mounted: Vec::with_capacity(ElementKind::ALL.len()),
            mounted_orientation: None,
            saved: None,
        }
    }

    /// Creates and attaches the shutter, back and framing elements.
    ///
    /// Activations are sent on `actions`. A previous mount is removed
    /// first so elements never accumulate.
    pub fn mount(&mut self, orientation: Orientation, actions: &UnboundedSender<OverlayAction>) {
        if !self.mounted.is_empty() {
            tracing::debug!("Overlay already mounted, replacing");
            self.unmount();
        }

        for kind in ElementKind::ALL {
            let id = self
                .surface
                .append(OverlayElement::new(kind, orientation, actions));
            self.mounted.push((kind, id));
        }
        self.mounted_orientation = Some(orientation);

        tracing::debug!(%orientation, "Overlay mounted");
    }

    /// Removes every mounted element. Returns how many were removed.
    ///
    /// Calling this with nothing mounted is a no-op.
    pub fn unmount(&mut self) -> usize {
        let mut removed = 0;
        for (kind, id) in self.mounted.drain(..) {
            if self.surface.remove(id) {
                removed += 1;
            } else {
                tracing::warn!(?kind, "Overlay element was already detached");
            }
        }
        if self.mounted_orientation.take().is_some() {
            tracing::debug!(removed, "Overlay unmounted");
        }
        removed
    }

    /// Hides the host root and locks its scroll container.
    ///
    /// The prior inline values are saved; hiding twice keeps the first
    /// snapshot.
    pub fn hide_host(&mut self) {
        if self.saved.is_some() {
            return;
        }
        self.saved = Some(StyleSnapshot {
            host_visibility: self.host.root.style(VISIBILITY),
            scroll_overflow_y: self.host.scroll_container.style(OVERFLOW_Y),
        });
        self.host.root.set_style(VISIBILITY, Some("hidden"));
        self.host.scroll_container.set_style(OVERFLOW_Y, Some("hidden"));
    }

    /// Restores exactly the values saved by [`hide_host`](Self::hide_host).
    pub fn restore_host(&mut self) {
        let Some(snapshot) = self.saved.take() else {
            return;
        };
        self.host
            .root
            .set_style(VISIBILITY, snapshot.host_visibility.as_deref());
        self.host
            .scroll_container
            .set_style(OVERFLOW_Y, snapshot.scroll_overflow_y.as_deref());
    }

    /// Returns true while elements are mounted.
    pub fn is_mounted(&self) -> bool {
        !self.mounted.is_empty()
    }

    /// Number of mounted elements.
    pub fn mounted_len(&self) -> usize {
        self.mounted.len()
    }

    /// Orientation the current overlay was laid out for.
    pub fn mounted_orientation(&self) -> Option<Orientation> {
        self.mounted_orientation
    }

    /// Returns true while the host screen is hidden.
    pub fn is_host_hidden(&self) -> bool {
        self.saved.is_some()
    }
}

impl std::fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("mounted", &self.mounted)
            .field("mounted_orientation", &self.mounted_orientation)
            .field("saved", &self.saved)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{SharedStyle, SharedSurface};
    use tokio::sync::mpsc;

    fn manager() -> (OverlayManager, SharedSurface, SharedStyle, SharedStyle) {
        let surface = SharedSurface::new();
        let root = SharedStyle::new();
        let scroll = SharedStyle::with(OVERFLOW_Y, "auto");
        let manager = OverlayManager::new(
            surface.clone(),
            HostScreen::new(root.clone(), scroll.clone()),
        );
        (manager, surface, root, scroll)
    }

    #[test]
    fn test_mount_creates_three_classed_elements() {
        let (mut manager, surface, _, _) = manager();
        let (tx, _rx) = mpsc::unbounded_channel();

        manager.mount(Orientation::Landscape, &tx);
        assert_eq!(manager.mounted_len(), 3);
        assert_eq!(
            surface.classes(),
            vec![
                "camera-shoot-btn landscape".to_owned(),
                "camera-back-btn landscape".to_owned(),
                "camera-rect landscape".to_owned(),
            ]
        );
    }

    #[test]
    fn test_remount_replaces_elements() {
        let (mut manager, surface, _, _) = manager();
        let (tx, _rx) = mpsc::unbounded_channel();

        manager.mount(Orientation::Landscape, &tx);
        manager.mount(Orientation::Portrait, &tx);
        assert_eq!(surface.len(), 3);
        assert_eq!(manager.mounted_orientation(), Some(Orientation::Portrait));
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let (mut manager, surface, _, _) = manager();
        let (tx, _rx) = mpsc::unbounded_channel();

        assert_eq!(manager.unmount(), 0);
        manager.mount(Orientation::Portrait, &tx);
        assert_eq!(manager.unmount(), 3);
        assert_eq!(manager.unmount(), 0);
        assert!(surface.is_empty());
        assert!(!manager.is_mounted());
    }

    #[test]
    fn test_restore_returns_prior_values() {
        let (mut manager, _, root, scroll) = manager();

        manager.hide_host();
        assert!(manager.is_host_hidden());
        assert_eq!(root.get(VISIBILITY).as_deref(), Some("hidden"));
        assert_eq!(scroll.get(OVERFLOW_Y).as_deref(), Some("hidden"));

        // A second hide must not overwrite the snapshot with "hidden".
        manager.hide_host();

        manager.restore_host();
        assert!(!manager.is_host_hidden());
        assert_eq!(root.get(VISIBILITY), None);
        assert_eq!(scroll.get(OVERFLOW_Y).as_deref(), Some("auto"));
    }

    #[test]
    fn test_restore_without_hide_is_noop() {
        let (mut manager, _, root, scroll) = manager();
        manager.restore_host();
        assert_eq!(root.get(VISIBILITY), None);
        assert_eq!(scroll.get(OVERFLOW_Y).as_deref(), Some("auto"));
    }
}
