use std::cell::Cell;
use std::rc::Rc;

use scrollie_core::{ElementId, ScrollElement};

#[derive(Debug)]
struct PaneState {
    id: ElementId,
    offset: Cell<f64>,
    content_lines: usize,
    viewport: Cell<u16>,
}

/// A scrollable text pane measured in terminal rows
///
/// The offset is fractional so eased positions survive between frames;
/// rendering rounds it to a whole row. Clones share state.
#[derive(Debug, Clone)]
pub struct ScrollPane {
    state: Rc<PaneState>,
}

impl ScrollPane {
    pub fn new(content_lines: usize) -> Self {
        Self {
            state: Rc::new(PaneState {
                id: ElementId::next(),
                offset: Cell::new(0.0),
                content_lines,
                viewport: Cell::new(0),
            }),
        }
    }

    pub fn viewport(&self) -> u16 {
        self.state.viewport.get()
    }

    /// Update the visible height, re-clamping the offset
    pub fn set_viewport(&self, rows: u16) {
        self.state.viewport.set(rows);
        self.set_scroll_top(self.scroll_top());
    }

    pub fn content_lines(&self) -> usize {
        self.state.content_lines
    }

    pub fn max_scroll(&self) -> f64 {
        self.content_lines()
            .saturating_sub(self.viewport() as usize) as f64
    }

    /// First visible row
    pub fn row(&self) -> u16 {
        self.scroll_top().round().clamp(0.0, u16::MAX as f64) as u16
    }
}

impl ScrollElement for ScrollPane {
    fn id(&self) -> ElementId {
        self.state.id
    }

    fn scroll_top(&self) -> f64 {
        self.state.offset.get()
    }

    fn set_scroll_top(&self, offset: f64) {
        self.state.offset.set(offset.clamp(0.0, self.max_scroll()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_clamped_to_content() {
        let pane = ScrollPane::new(100);
        pane.set_viewport(20);
        assert_eq!(pane.max_scroll(), 80.0);

        pane.set_scroll_top(500.0);
        assert_eq!(pane.scroll_top(), 80.0);
        pane.set_scroll_top(-3.0);
        assert_eq!(pane.scroll_top(), 0.0);
    }

    #[test]
    fn test_growing_viewport_pulls_offset_back() {
        let pane = ScrollPane::new(100);
        pane.set_viewport(20);
        pane.set_scroll_top(80.0);

        pane.set_viewport(50);
        assert_eq!(pane.scroll_top(), 50.0);
    }

    #[test]
    fn test_row_rounds_fractional_offset() {
        let pane = ScrollPane::new(100);
        pane.set_viewport(10);
        pane.set_scroll_top(12.6);
        assert_eq!(pane.row(), 13);
        pane.set_scroll_top(12.4);
        assert_eq!(pane.row(), 12);
    }

    #[test]
    fn test_clones_share_identity() {
        let pane = ScrollPane::new(10);
        let other = pane.clone();
        other.set_scroll_top(4.0);
        assert_eq!(pane.id(), other.id());
        assert_eq!(pane.scroll_top(), 4.0);
        assert_ne!(pane.id(), ScrollPane::new(10).id());
    }
}
