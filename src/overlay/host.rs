//! Host screen seams: styled elements and the overlay surface.

use super::{ElementKind, OverlayElement};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Style property toggled on the host root.
pub const VISIBILITY: &str = "visibility";
/// Style property toggled on the host scroll container.
pub const OVERFLOW_Y: &str = "overflow-y";

/// An element whose inline style can be read and written.
///
/// `None` means the property is not set inline.
pub trait StyleTarget: Send {
    /// Reads an inline style property.
    fn style(&self, property: &str) -> Option<String>;

    /// Writes an inline style property; `None` removes it.
    fn set_style(&mut self, property: &str, value: Option<&str>);
}

/// Identifier of an element attached to an [`OverlaySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Where overlay elements are attached (the document body).
pub trait OverlaySurface: Send {
    /// Attaches an element and returns its id.
    fn append(&mut self, element: OverlayElement) -> ElementId;

    /// Detaches an element. Returns false if it was not attached.
    fn remove(&mut self, id: ElementId) -> bool;
}

/// Host style values captured before the overlay mutates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    /// Host root `visibility`.
    pub host_visibility: Option<String>,
    /// Scroll container `overflow-y`.
    pub scroll_overflow_y: Option<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory style target shared between the overlay and its observer.
#[derive(Debug, Clone, Default)]
pub struct SharedStyle {
    properties: Arc<Mutex<BTreeMap<String, String>>>,
}

impl SharedStyle {
    /// Creates an element with no inline style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element with one inline property set.
    pub fn with(property: &str, value: &str) -> Self {
        let style = Self::new();
        lock(&style.properties).insert(property.to_owned(), value.to_owned());
        style
    }

    /// Reads an inline style property.
    pub fn get(&self, property: &str) -> Option<String> {
        lock(&self.properties).get(property).cloned()
    }
}

impl StyleTarget for SharedStyle {
    fn style(&self, property: &str) -> Option<String> {
        self.get(property)
    }

    fn set_style(&mut self, property: &str, value: Option<&str>) {
        let mut properties = lock(&self.properties);
        match value {
            Some(value) => {
                properties.insert(property.to_owned(), value.to_owned());
            }
            None => {
                properties.remove(property);
            }
        }
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    elements: BTreeMap<ElementId, OverlayElement>,
}

/// In-memory overlay surface shared between the overlay and its observer.
///
/// Lets headless hosts and tests inspect what is mounted and "click"
/// elements.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl SharedSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached elements.
    pub fn len(&self) -> usize {
        lock(&self.state).elements.len()
    }

    /// Returns true if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class attributes of attached elements, in attach order.
    pub fn classes(&self) -> Vec<String> {
        lock(&self.state)
            .elements
            .values()
            .map(|element| element.class_name().to_owned())
            .collect()
    }

    /// Activates the first attached element of `kind`.
    ///
    /// Returns true if an action was raised.
    pub fn activate(&self, kind: ElementKind) -> bool {
        lock(&self.state)
            .elements
            .values()
            .find(|element| element.kind() == kind)
            .map_or(false, OverlayElement::activate)
    }
}

impl OverlaySurface for SharedSurface {
    fn append(&mut self, element: OverlayElement) -> ElementId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = ElementId(state.next_id);
        state.elements.insert(id, element);
        id
    }

    fn remove(&mut self, id: ElementId) -> bool {
        lock(&self.state).elements.remove(&id).is_some()
    }
}
