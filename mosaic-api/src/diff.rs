//! Change detection between model revisions.
//!
//! The engine uses these to decide how much work a reload needs: a content
//! change only reconfigures the visible view, a kind/size/children change
//! re-measures the item, and a whole-model change rebuilds the component.

use crate::item::Item;
use crate::model::ComponentModel;

/// The most significant difference between two items.
///
/// Variants are ordered from least to most significant; `Item::diff`
/// reports the highest one that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemDiff {
    None,
    Identifier,
    Meta,
    Action,
    Image,
    Text,
    Subtitle,
    Title,
    Size,
    Children,
    Kind,
}

impl ItemDiff {
    /// The item must be measured again (and its view possibly swapped).
    pub fn needs_reload(self) -> bool {
        matches!(self, ItemDiff::Size | ItemDiff::Children | ItemDiff::Kind)
    }
}

impl Item {
    /// Compare against a newer revision of the same position. `index` is
    /// ignored because it is positional.
    pub fn diff(&self, other: &Item) -> ItemDiff {
        if self.kind != other.kind {
            ItemDiff::Kind
        } else if self.children != other.children {
            ItemDiff::Children
        } else if self.size != other.size {
            ItemDiff::Size
        } else if self.title != other.title {
            ItemDiff::Title
        } else if self.subtitle != other.subtitle {
            ItemDiff::Subtitle
        } else if self.text != other.text {
            ItemDiff::Text
        } else if self.image != other.image {
            ItemDiff::Image
        } else if self.action != other.action {
            ItemDiff::Action
        } else if self.meta != other.meta {
            ItemDiff::Meta
        } else if self.identifier != other.identifier {
            ItemDiff::Identifier
        } else {
            ItemDiff::None
        }
    }
}

/// Positional change set between two item sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    /// Positions present only in the new sequence.
    pub insertions: Vec<usize>,
    /// Positions present only in the old sequence.
    pub deletions: Vec<usize>,
    /// Positions whose item must be re-measured.
    pub reloads: Vec<usize>,
    /// Positions whose item only needs reconfiguring.
    pub updates: Vec<usize>,
    /// Subset of `reloads` where the item kind changed.
    pub kind_changes: Vec<usize>,
}

impl Changes {
    pub fn between(old: &[Item], new: &[Item]) -> Self {
        let mut changes = Changes::default();
        let shared = old.len().min(new.len());

        for (position, (before, after)) in old.iter().zip(new.iter()).enumerate() {
            match before.diff(after) {
                ItemDiff::None => {}
                diff if diff.needs_reload() => {
                    changes.reloads.push(position);
                    if diff == ItemDiff::Kind {
                        changes.kind_changes.push(position);
                    }
                }
                _ => changes.updates.push(position),
            }
        }

        changes.insertions.extend(shared..new.len());
        changes.deletions.extend(shared..old.len());
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
            && self.deletions.is_empty()
            && self.reloads.is_empty()
            && self.updates.is_empty()
    }
}

/// The most significant difference between two component models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelDiff {
    None,
    Kind,
    Layout,
    Interaction,
    Size,
    Header,
    Footer,
    Items,
    Meta,
    Identifier,
}

impl ComponentModel {
    pub fn diff(&self, other: &ComponentModel) -> ModelDiff {
        if self.kind != other.kind {
            ModelDiff::Kind
        } else if self.layout != other.layout {
            ModelDiff::Layout
        } else if self.interaction != other.interaction {
            ModelDiff::Interaction
        } else if self.size != other.size {
            ModelDiff::Size
        } else if self.header != other.header {
            ModelDiff::Header
        } else if self.footer != other.footer {
            ModelDiff::Footer
        } else if !Changes::between(&self.items, &other.items).is_empty() {
            ModelDiff::Items
        } else if self.meta != other.meta {
            ModelDiff::Meta
        } else if self.identifier != other.identifier {
            ModelDiff::Identifier
        } else {
            ModelDiff::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::model::{ComponentKind, LayoutConfig};

    #[test]
    fn test_identical_items_have_no_diff() {
        let a = Item::new("a").with_kind("card");
        let mut b = a.clone();
        b.index = 5;
        assert_eq!(a.diff(&b), ItemDiff::None);
    }

    #[test]
    fn test_kind_outranks_content_changes() {
        let a = Item::new("a").with_kind("card");
        let b = Item::new("b").with_kind("banner");
        assert_eq!(a.diff(&b), ItemDiff::Kind);
        assert!(a.diff(&b).needs_reload());
    }

    #[test]
    fn test_content_changes_only_update() {
        let a = Item::new("a");
        let b = Item::new("a").with_subtitle("new");
        assert_eq!(a.diff(&b), ItemDiff::Subtitle);
        assert!(!a.diff(&b).needs_reload());
    }

    #[test]
    fn test_changes_bucket_positions() {
        let old = vec![
            Item::new("same"),
            Item::new("title"),
            Item::new("sized"),
            Item::new("gone"),
        ];
        let new = vec![
            Item::new("same"),
            Item::new("title changed"),
            Item::new("sized").with_size(Size::new(10.0, 10.0)),
        ];

        let changes = Changes::between(&old, &new);
        assert_eq!(changes.updates, vec![1]);
        assert_eq!(changes.reloads, vec![2]);
        assert_eq!(changes.deletions, vec![3]);
        assert!(changes.insertions.is_empty());
        assert!(changes.kind_changes.is_empty());
    }

    #[test]
    fn test_growth_is_insertions() {
        let old = vec![Item::new("a")];
        let new = vec![Item::new("a"), Item::new("b"), Item::new("c")];
        let changes = Changes::between(&old, &new);
        assert_eq!(changes.insertions, vec![1, 2]);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_model_diff_detects_layout_change() {
        let a = ComponentModel::new(ComponentKind::List);
        let b = a.clone().with_layout(LayoutConfig {
            span: 3,
            ..LayoutConfig::default()
        });
        assert_eq!(a.diff(&b), ModelDiff::Layout);
        assert_eq!(a.diff(&a.clone()), ModelDiff::None);
    }

    #[test]
    fn test_model_diff_detects_item_changes() {
        let a = ComponentModel::new(ComponentKind::List).with_items(vec![Item::new("a")]);
        let b = ComponentModel::new(ComponentKind::List).with_items(vec![Item::new("b")]);
        assert_eq!(a.diff(&b), ModelDiff::Items);
    }
}
