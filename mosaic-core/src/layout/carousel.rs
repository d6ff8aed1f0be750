//! Carousel layout: one horizontal line of items.

use mosaic_api::{ComponentKind, ComponentModel, Paginate, Rect, ScrollDirection, Size};

use super::{LayoutPass, LayoutStrategy, span_width};
use crate::view::ScrollView;

pub struct CarouselLayout;

impl LayoutStrategy for CarouselLayout {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Carousel
    }

    /// The model height, grown to fit the tallest item plus vertical insets.
    fn compute_height(&self, model: &ComponentModel, _container: Size) -> f32 {
        let insets = model.layout.inset.vertical();
        model
            .items
            .iter()
            .map(|item| item.size.height + insets)
            .fold(model.size.height, f32::max)
    }

    fn item_container(&self, model: &ComponentModel, container: Size) -> Size {
        let layout = &model.layout;
        let width = if layout.dynamic_span && layout.span > 0 {
            span_width(model, container, layout.span)
        } else {
            (container.width - layout.inset.horizontal()).max(0.0)
        };
        let height = if model.size.height > 0.0 {
            (model.size.height - layout.inset.vertical()).max(0.0)
        } else {
            container.height
        };
        Size::new(width, height)
    }

    fn setup(&self, view: &mut ScrollView, model: &ComponentModel, container: Size) {
        view.scroll_direction = ScrollDirection::Horizontal;
        view.paging_enabled = model.interaction.paginate != Paginate::Disabled;
        view.frame.width = container.width;
    }

    fn layout(&self, model: &ComponentModel, container: Size) -> LayoutPass {
        let inset = model.layout.inset;
        let mut frames = Vec::with_capacity(model.items.len());
        let mut x = inset.left;
        for (position, item) in model.items.iter().enumerate() {
            if position > 0 {
                x += model.layout.item_spacing;
            }
            frames.push(Rect::new(x, inset.top, item.size.width, item.size.height));
            x += item.size.width;
        }

        LayoutPass {
            frames,
            content_size: Size::new(
                (x + inset.right).max(container.width),
                self.compute_height(model, container),
            ),
        }
    }
}
