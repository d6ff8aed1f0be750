//! Row layout: a grid whose height follows its content.

use mosaic_api::{ComponentKind, ComponentModel, ScrollDirection, Size};

use super::{LayoutPass, LayoutStrategy, flow, span_width};
use crate::view::ScrollView;

pub struct RowLayout;

impl RowLayout {
    fn columns(model: &ComponentModel) -> Option<usize> {
        (model.layout.span > 0).then_some(model.layout.span)
    }
}

impl LayoutStrategy for RowLayout {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Row
    }

    /// Stacked line heights plus line spacing and insets, clamped to the
    /// container height.
    fn compute_height(&self, model: &ComponentModel, container: Size) -> f32 {
        let pass = flow(model, container, Self::columns(model));
        pass.content_size.height.min(container.height)
    }

    fn item_container(&self, model: &ComponentModel, container: Size) -> Size {
        let span = model.layout.span.max(1);
        Size::new(span_width(model, container, span), container.height)
    }

    fn setup(&self, view: &mut ScrollView, _model: &ComponentModel, container: Size) {
        view.scroll_direction = ScrollDirection::Vertical;
        view.paging_enabled = false;
        view.frame.width = container.width;
    }

    fn layout(&self, model: &ComponentModel, container: Size) -> LayoutPass {
        flow(model, container, Self::columns(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_api::{Item, LayoutConfig};

    fn row(heights: &[f32], span: usize) -> ComponentModel {
        ComponentModel::new(ComponentKind::Row)
            .with_items(
                heights
                    .iter()
                    .map(|h| Item::new("").with_size(Size::new(50.0, *h)))
                    .collect(),
            )
            .with_layout(LayoutConfig {
                span,
                line_spacing: 10.0,
                ..LayoutConfig::default()
            })
    }

    #[test]
    fn test_height_sums_line_maxima() {
        let model = row(&[20.0, 40.0, 30.0], 2);
        // Line one is 40 tall, line two 30, plus one line spacing.
        assert_eq!(RowLayout.compute_height(&model, Size::new(320.0, 600.0)), 80.0);
    }

    #[test]
    fn test_height_clamps_to_container() {
        let model = row(&[200.0, 200.0, 200.0], 1);
        assert_eq!(RowLayout.compute_height(&model, Size::new(320.0, 300.0)), 300.0);
    }

    #[test]
    fn test_item_container_without_span_is_full_width() {
        let model = row(&[], 0);
        assert_eq!(
            RowLayout.item_container(&model, Size::new(320.0, 600.0)),
            Size::new(320.0, 600.0)
        );
    }
}
