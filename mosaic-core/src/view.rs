//! ScrollView - the logical state of a component's live scrollable view.
//!
//! The concrete widget belongs to the host toolkit. This is the part the
//! engine owns and mutates during the apply phase: frame, content extent,
//! offset and the per-item frames from the last layout pass.

use mosaic_api::{Point, Rect, ScrollDirection, Size};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollView {
    pub frame: Rect,
    pub content_size: Size,
    pub content_offset: Point,
    pub scroll_direction: ScrollDirection,
    pub paging_enabled: bool,
    /// Item frames from the last layout pass, in item order.
    pub item_frames: Vec<Rect>,
    /// Bumped every time the host should reload its cells.
    pub reload_generation: u64,
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the host to reload every visible cell.
    pub fn reload(&mut self) {
        self.reload_generation += 1;
    }

    /// Largest valid content offset along the scroll axis.
    pub fn max_offset(&self) -> f32 {
        match self.scroll_direction {
            ScrollDirection::Vertical => (self.content_size.height - self.frame.height).max(0.0),
            ScrollDirection::Horizontal => (self.content_size.width - self.frame.width).max(0.0),
        }
    }

    /// Move the content offset along the scroll axis, clamped to the content.
    pub fn scroll_to(&mut self, offset: f32) {
        let offset = offset.clamp(0.0, self.max_offset());
        match self.scroll_direction {
            ScrollDirection::Vertical => self.content_offset.y = offset,
            ScrollDirection::Horizontal => self.content_offset.x = offset,
        }
    }

    /// Frame of the item at `index` from the last layout pass.
    pub fn item_frame(&self, index: usize) -> Option<Rect> {
        self.item_frames.get(index).copied()
    }
}
