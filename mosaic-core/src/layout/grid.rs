//! Grid layout: items flow into wrapping lines.

use mosaic_api::{ComponentKind, ComponentModel, Paginate, Size};

use super::{LayoutPass, LayoutStrategy, flow, span_width};
use crate::view::ScrollView;

pub struct GridLayout;

impl LayoutStrategy for GridLayout {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Grid
    }

    /// Grid height is a layout property, not content-driven: always the
    /// model's declared height.
    fn compute_height(&self, model: &ComponentModel, _container: Size) -> f32 {
        model.size.height
    }

    fn item_container(&self, model: &ComponentModel, container: Size) -> Size {
        let width = if model.layout.span > 0 {
            span_width(model, container, model.layout.span)
        } else {
            (container.width - model.layout.inset.horizontal()).max(0.0)
        };
        Size::new(width, container.height)
    }

    fn setup(&self, view: &mut ScrollView, model: &ComponentModel, container: Size) {
        view.scroll_direction = model.interaction.scroll_direction;
        view.paging_enabled = model.interaction.paginate != Paginate::Disabled;
        view.frame.width = container.width;
    }

    fn layout(&self, model: &ComponentModel, container: Size) -> LayoutPass {
        let columns = (model.layout.span > 0).then_some(model.layout.span);
        flow(model, container, columns)
    }
}
