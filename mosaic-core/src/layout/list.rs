//! Vertical list layout.

use mosaic_api::{ComponentKind, ComponentModel, Rect, ScrollDirection, Size};

use super::{LayoutPass, LayoutStrategy};
use crate::view::ScrollView;

pub struct ListLayout;

impl LayoutStrategy for ListLayout {
    fn kind(&self) -> ComponentKind {
        ComponentKind::List
    }

    /// Sum item heights in order, saturating at the container height.
    ///
    /// Accumulation stops at the first item that pushes the total past the
    /// container; later items are never measured. This is not the same as
    /// summing everything and clamping afterwards.
    fn compute_height(&self, model: &ComponentModel, container: Size) -> f32 {
        let max_height = container.height;
        let mut height = 0.0f32;
        for item in &model.items {
            height += item.size.height;
            if height > max_height {
                height = max_height;
                break;
            }
        }
        height
    }

    fn item_container(&self, model: &ComponentModel, container: Size) -> Size {
        Size::new(
            (container.width - model.layout.inset.horizontal()).max(0.0),
            container.height,
        )
    }

    fn setup(&self, view: &mut ScrollView, _model: &ComponentModel, container: Size) {
        view.scroll_direction = ScrollDirection::Vertical;
        view.paging_enabled = false;
        view.frame.width = container.width;
    }

    fn layout(&self, model: &ComponentModel, container: Size) -> LayoutPass {
        let inset = model.layout.inset;
        let full_width = (container.width - inset.horizontal()).max(0.0);

        let mut frames = Vec::with_capacity(model.items.len());
        let mut y = inset.top;
        for (position, item) in model.items.iter().enumerate() {
            if position > 0 {
                y += model.layout.item_spacing;
            }
            let width = if item.size.width > 0.0 {
                item.size.width
            } else {
                full_width
            };
            frames.push(Rect::new(inset.left, y, width, item.size.height));
            y += item.size.height;
        }

        LayoutPass {
            frames,
            content_size: Size::new(container.width, y + inset.bottom),
        }
    }
}
