use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a scrollable element, the key for per-element sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ElementId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A container whose vertical scroll offset can be read and written
///
/// The animator keeps its own clone of the element it was handed, so a
/// clone must be another handle to the same container: same [`id`](Self::id),
/// same offset, same attachment state. Implement `Clone` over shared state
/// (an `Rc` or a host reference), never as a deep copy.
pub trait ScrollElement {
    fn id(&self) -> ElementId;

    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&self, offset: f64);

    /// Detached elements are ignored by the animator
    fn is_attached(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct VirtualState {
    id: ElementId,
    scroll_top: Cell<f64>,
    max_scroll: f64,
    attached: Cell<bool>,
    writes: RefCell<Vec<f64>>,
}

/// Headless scroll container
///
/// Behaves like a viewport over taller content: offsets are clamped to
/// `[0, max_scroll]`. Every write is recorded. Clones share state.
#[derive(Debug, Clone)]
pub struct VirtualElement {
    state: Rc<VirtualState>,
}

impl VirtualElement {
    /// A viewport of `viewport` units over `content` units of content
    pub fn new(viewport: f64, content: f64) -> Self {
        Self {
            state: Rc::new(VirtualState {
                id: ElementId::next(),
                scroll_top: Cell::new(0.0),
                max_scroll: (content - viewport).max(0.0),
                attached: Cell::new(true),
                writes: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Unbounded element, useful when clamping would hide the curve
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn max_scroll(&self) -> f64 {
        self.state.max_scroll
    }

    pub fn detach(&self) {
        self.state.attached.set(false);
    }

    /// Every value written so far, after clamping
    pub fn writes(&self) -> Vec<f64> {
        self.state.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.state.writes.borrow_mut().clear();
    }
}

impl ScrollElement for VirtualElement {
    fn id(&self) -> ElementId {
        self.state.id
    }

    fn scroll_top(&self) -> f64 {
        self.state.scroll_top.get()
    }

    fn set_scroll_top(&self, offset: f64) {
        let clamped = offset.clamp(0.0, self.state.max_scroll);
        self.state.scroll_top.set(clamped);
        self.state.writes.borrow_mut().push(clamped);
    }

    fn is_attached(&self) -> bool {
        self.state.attached.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_clamped() {
        let element = VirtualElement::new(100.0, 1000.0);
        element.set_scroll_top(1200.0);
        assert_eq!(element.scroll_top(), 900.0);
        element.set_scroll_top(-5.0);
        assert_eq!(element.scroll_top(), 0.0);
        assert_eq!(element.writes(), vec![900.0, 0.0]);
    }

    #[test]
    fn test_ids_are_unique_and_shared_by_clones() {
        let a = VirtualElement::unbounded();
        let b = VirtualElement::unbounded();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_clones_share_offset_and_attachment() {
        let element = VirtualElement::new(10.0, 100.0);
        let handle = element.clone();
        handle.set_scroll_top(40.0);
        assert_eq!(element.scroll_top(), 40.0);
        assert_eq!(element.writes(), vec![40.0]);
        handle.detach();
        assert!(!element.is_attached());
    }

    #[test]
    fn test_detach() {
        let element = VirtualElement::unbounded();
        assert!(element.is_attached());
        element.detach();
        assert!(!element.is_attached());
    }
}
