//! Layout strategies, one per component kind.
//!
//! A strategy answers three questions for its kind: how tall the component
//! is when its height is content-driven, what container an item view is
//! measured against, and where every item lands. Components select their
//! strategy from `ComponentModel::kind`; there is no per-kind subclassing.

mod carousel;
mod grid;
mod list;
mod row;

pub use carousel::CarouselLayout;
pub use grid::GridLayout;
pub use list::ListLayout;
pub use row::RowLayout;

use mosaic_api::{ComponentKind, ComponentModel, Paginate, Rect, ScrollDirection, Size};

use crate::view::ScrollView;

/// Result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPass {
    /// One frame per item, in item order.
    pub frames: Vec<Rect>,
    pub content_size: Size,
}

pub trait LayoutStrategy: Send + Sync {
    fn kind(&self) -> ComponentKind;

    /// Content-driven height. Only meaningful when `layout.dynamic_height`
    /// is set; the component handles the fixed-height case.
    fn compute_height(&self, model: &ComponentModel, container: Size) -> f32;

    /// Container size handed to item views when they measure themselves.
    fn item_container(&self, model: &ComponentModel, container: Size) -> Size;

    /// Configure a view for this strategy (axis, paging, width).
    fn setup(&self, view: &mut ScrollView, model: &ComponentModel, container: Size);

    /// Position every item and compute the scrollable content size.
    fn layout(&self, model: &ComponentModel, container: Size) -> LayoutPass;
}

static LIST: ListLayout = ListLayout;
static GRID: GridLayout = GridLayout;
static CAROUSEL: CarouselLayout = CarouselLayout;
static ROW: RowLayout = RowLayout;

/// The strategy for a component kind.
pub fn strategy_for(kind: ComponentKind) -> &'static dyn LayoutStrategy {
    match kind {
        ComponentKind::List => &LIST,
        ComponentKind::Grid => &GRID,
        ComponentKind::Carousel => &CAROUSEL,
        ComponentKind::Row => &ROW,
    }
}

/// Snap a proposed scroll offset according to the pagination mode.
///
/// `ByItem` snaps to the nearest item origin along the scroll axis, `ByPage`
/// to the nearest multiple of the viewport extent.
pub fn snap_offset(
    paginate: Paginate,
    frames: &[Rect],
    direction: ScrollDirection,
    proposed: f32,
    viewport: f32,
) -> f32 {
    match paginate {
        Paginate::Disabled => proposed,
        Paginate::ByPage => {
            if viewport <= 0.0 {
                proposed
            } else {
                (proposed / viewport).round().max(0.0) * viewport
            }
        }
        Paginate::ByItem => frames
            .iter()
            .map(|frame| match direction {
                ScrollDirection::Horizontal => frame.x,
                ScrollDirection::Vertical => frame.y,
            })
            .min_by(|a, b| (a - proposed).abs().total_cmp(&(b - proposed).abs()))
            .unwrap_or(proposed),
    }
}

/// Width available to one of `span` equally sized columns.
pub(crate) fn span_width(model: &ComponentModel, container: Size, span: usize) -> f32 {
    let span = span.max(1) as f32;
    let available = container.width
        - model.layout.inset.horizontal()
        - model.layout.item_spacing * (span - 1.0);
    (available / span).max(0.0)
}

/// Wrap items into lines, left to right.
///
/// With `columns` set, a line holds exactly that many items; otherwise a line
/// breaks when the next item would cross the right inset.
pub(crate) fn flow(model: &ComponentModel, container: Size, columns: Option<usize>) -> LayoutPass {
    let inset = model.layout.inset;
    let spacing = model.layout.item_spacing;
    let line_spacing = model.layout.line_spacing;
    let right_edge = container.width - inset.right;

    let mut frames = Vec::with_capacity(model.items.len());
    let mut x = inset.left;
    let mut y = inset.top;
    let mut line_height = 0.0f32;
    let mut column = 0usize;

    for item in &model.items {
        let size = item.size;
        let wrap = match columns {
            Some(n) => column >= n.max(1),
            None => column > 0 && x + size.width > right_edge,
        };
        if wrap {
            x = inset.left;
            y += line_height + line_spacing;
            line_height = 0.0;
            column = 0;
        }

        frames.push(Rect::new(x, y, size.width, size.height));
        x += size.width + spacing;
        line_height = line_height.max(size.height);
        column += 1;
    }

    let height = if frames.is_empty() {
        inset.vertical()
    } else {
        y + line_height + inset.bottom
    };

    LayoutPass {
        frames,
        content_size: Size::new(container.width, height),
    }
}
