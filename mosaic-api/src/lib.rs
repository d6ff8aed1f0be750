//! Mosaic API - the data model shared by the engine and its hosts.
//!
//! Items and component models are plain serde values: hosts decode them
//! from key-value documents, the engine measures and lays them out, and the
//! state cache persists them.

mod de;
mod diff;
mod error;
mod geometry;
mod item;
mod model;

pub use diff::{Changes, ItemDiff, ModelDiff};
pub use error::ModelError;
pub use geometry::{Insets, Point, Rect, Size};
pub use item::Item;
pub use model::{
    ComponentKind, ComponentModel, Interaction, LayoutConfig, PageIndicatorPlacement, Paginate,
    ScrollDirection,
};
