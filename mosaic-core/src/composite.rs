//! Composite map: nested child components keyed by index pairs.
//!
//! Outer key is the owning component's index, inner key the item index that
//! declares children. Children are referenced, never embedded in the parent
//! model. A missing entry at either level means "no children".

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::component::Component;

type ChildMap = HashMap<usize, Vec<Component>>;

#[derive(Default)]
pub struct CompositeMap {
    entries: RwLock<HashMap<usize, ChildMap>>,
}

impl CompositeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children of `item_index` inside component `component_index`.
    pub fn resolve(&self, component_index: usize, item_index: usize) -> Option<Vec<Component>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&component_index)?
            .get(&item_index)
            .cloned()
    }

    /// Record children for one item. An empty list removes the entry.
    pub fn insert(&self, component_index: usize, item_index: usize, children: Vec<Component>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if children.is_empty() {
            if let Some(items) = entries.get_mut(&component_index) {
                items.remove(&item_index);
                if items.is_empty() {
                    entries.remove(&component_index);
                }
            }
            return;
        }
        entries
            .entry(component_index)
            .or_default()
            .insert(item_index, children);
    }

    /// Swap in the full child map of one component.
    pub(crate) fn replace(&self, component_index: usize, children: ChildMap) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let children: ChildMap = children.into_iter().filter(|(_, c)| !c.is_empty()).collect();
        if children.is_empty() {
            entries.remove(&component_index);
        } else {
            entries.insert(component_index, children);
        }
    }

    /// Forget every child of a component.
    pub fn remove(&self, component_index: usize) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&component_index);
    }

    /// Item indexes with children, sorted.
    pub fn item_indexes(&self, component_index: usize) -> Vec<usize> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut indexes: Vec<usize> = entries
            .get(&component_index)
            .map(|items| items.keys().copied().collect())
            .unwrap_or_default();
        indexes.sort_unstable();
        indexes
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
