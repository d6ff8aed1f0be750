//! DataSource/Delegate bridge between a host toolkit and a component.
//!
//! The bridge answers cell queries by delegating to its component and item
//! manager; it holds nothing else. Indexes coming from the toolkit are
//! untrusted: out-of-range values produce zero sizes, no views and no
//! callbacks.

use mosaic_api::{Item, Size};

use crate::component::Component;
use crate::registry::ItemView;

/// Queries a host toolkit issues while rendering a collection.
pub trait DataSource {
    fn item_count(&self) -> usize;

    /// A configured view for the cell at `index`.
    fn view(&self, index: usize) -> Option<Box<dyn ItemView>>;

    fn size(&self, index: usize) -> Size;

    fn did_select(&self, index: usize);
}

pub struct ComponentBridge {
    component: Component,
}

impl ComponentBridge {
    pub fn new(component: Component) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Map a toolkit index to an item index.
    ///
    /// With infinite scrolling, the item list is padded on both ends by
    /// `buffer` wrapped copies so the toolkit can scroll past either edge.
    pub fn item_index(&self, index: usize) -> Option<usize> {
        let count = self.component.len();
        match self.buffer(count) {
            Some(buffer) if index < count + 2 * buffer => Some((index + count - buffer) % count),
            Some(_) => None,
            None => (index < count).then_some(index),
        }
    }

    /// Padding per side when infinite scrolling applies.
    fn buffer(&self, count: usize) -> Option<usize> {
        (count > 1 && self.component.infinite_scrolling()).then(|| {
            self.component
                .engine()
                .config()
                .infinite_scroll_buffer
                .min(count)
        })
    }

    fn resolve(&self, index: usize) -> Option<(usize, Item)> {
        let position = self.item_index(index)?;
        self.component.item(position).map(|item| (position, item))
    }

    /// Identifier the toolkit should use to dequeue the cell at `index`.
    pub fn identifier(&self, index: usize) -> String {
        match self.item_index(index) {
            Some(position) => self.component.identifier(position),
            None => self
                .component
                .engine()
                .registry()
                .default_identifier()
                .to_string(),
        }
    }

    /// Hand a view back for reuse.
    pub fn recycle(&self, identifier: &str, view: Box<dyn ItemView>) {
        self.component.manager().recycle(identifier, view);
    }

    /// Record the focused cell and notify delegates. Out of range clears
    /// focus.
    pub fn did_focus(&self, index: usize) {
        self.component.focus(self.item_index(index));
    }

    pub fn header_view(&self) -> Option<Box<dyn ItemView>> {
        self.component.header().map(|header| self.configured(&header))
    }

    pub fn footer_view(&self) -> Option<Box<dyn ItemView>> {
        self.component.footer().map(|footer| self.configured(&footer))
    }

    /// Where scrolling should settle for a proposed offset.
    pub fn will_end_dragging(&self, proposed: f32) -> f32 {
        self.component.target_content_offset(proposed)
    }

    fn configured(&self, item: &Item) -> Box<dyn ItemView> {
        let identifier = self.component.engine().registry().identifier(&item.kind);
        let mut view = self.component.manager().dequeue(&identifier);
        view.configure(item);
        view
    }
}

impl DataSource for ComponentBridge {
    fn item_count(&self) -> usize {
        let count = self.component.len();
        match self.buffer(count) {
            Some(buffer) => count + 2 * buffer,
            None => count,
        }
    }

    fn view(&self, index: usize) -> Option<Box<dyn ItemView>> {
        let (_, item) = self.resolve(index)?;
        Some(self.configured(&item))
    }

    fn size(&self, index: usize) -> Size {
        match self.item_index(index) {
            Some(position) => self.component.size_for_item(position),
            None => Size::ZERO,
        }
    }

    fn did_select(&self, index: usize) {
        let Some(position) = self.item_index(index) else {
            tracing::debug!(index, "toolkit selected out-of-range cell");
            return;
        };
        self.component.select(position);
    }
}
