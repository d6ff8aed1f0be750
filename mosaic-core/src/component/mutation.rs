//! Structural edits.
//!
//! Every edit replaces part of the item sequence and reindexes before
//! returning, then schedules prepare followed by a height update. The
//! completion fires once both have been applied, or immediately when the
//! edit changed nothing.

use mosaic_api::{Changes, ComponentModel, Item, ItemDiff};

use super::Component;
use crate::dispatch::{Completion, complete};

impl Component {
    pub fn append(&self, item: Item, completion: Option<Completion>) {
        self.append_items(vec![item], completion);
    }

    pub fn append_items(&self, items: Vec<Item>, completion: Option<Completion>) {
        self.mutate(false, completion, |model| {
            if items.is_empty() {
                return false;
            }
            model.items.extend(items);
            true
        });
    }

    pub fn prepend_items(&self, items: Vec<Item>, completion: Option<Completion>) {
        self.mutate(false, completion, |model| {
            if items.is_empty() {
                return false;
            }
            let mut items = items;
            items.append(&mut model.items);
            model.items = items;
            true
        });
    }

    /// Insert at `index`; positions past the end append.
    pub fn insert(&self, item: Item, index: usize, completion: Option<Completion>) {
        self.mutate(false, completion, |model| {
            let index = index.min(model.items.len());
            model.items.insert(index, item);
            true
        });
    }

    /// Replace the item at `index`. Out of range, or identical, is a no-op.
    pub fn update(&self, item: Item, index: usize, completion: Option<Completion>) {
        self.mutate_with(completion, |model| {
            let Some(slot) = model.items.get_mut(index) else {
                tracing::debug!(index, "update out of range");
                return None;
            };
            let diff = slot.diff(&item);
            if diff == ItemDiff::None {
                return None;
            }
            *slot = item;
            Some(diff == ItemDiff::Kind)
        });
    }

    /// Remove the item at `index`. Out of range is a no-op.
    pub fn delete(&self, index: usize, completion: Option<Completion>) {
        self.mutate(false, completion, |model| {
            if index >= model.items.len() {
                tracing::debug!(index, "delete out of range");
                return false;
            }
            model.items.remove(index);
            true
        });
    }

    /// Replace the whole item sequence.
    pub fn set_items(&self, items: Vec<Item>, completion: Option<Completion>) {
        self.mutate(false, completion, |model| {
            model.items = items;
            true
        });
    }

    /// Replace the items only if they differ from the current ones.
    ///
    /// Cached views are purged when any item changed kind.
    pub fn reload_if_needed(&self, items: Vec<Item>, completion: Option<Completion>) -> Changes {
        let mut changes = Changes::default();
        self.mutate_with(completion, |model| {
            changes = Changes::between(&model.items, &items);
            if changes.is_empty() {
                return None;
            }
            model.items = items;
            Some(!changes.kind_changes.is_empty())
        });
        changes
    }

    fn mutate(
        &self,
        purge: bool,
        completion: Option<Completion>,
        edit: impl FnOnce(&mut ComponentModel) -> bool,
    ) {
        self.mutate_with(completion, |model| edit(model).then_some(purge));
    }

    /// Apply `edit` under the lock. `edit` returns `None` when nothing
    /// changed, otherwise whether cached views must be purged.
    fn mutate_with(
        &self,
        completion: Option<Completion>,
        edit: impl FnOnce(&mut ComponentModel) -> Option<bool>,
    ) {
        let purge = {
            let mut state = self.lock();
            let purge = edit(&mut state.model);
            if purge.is_some() {
                state.model.refresh_indexes();
            }
            purge
        };

        match purge {
            Some(purge) => self.schedule_reload(purge, completion),
            None => complete(completion),
        }
    }

    /// Prepare, then update height, then notify delegates.
    fn schedule_reload(&self, purge: bool, completion: Option<Completion>) {
        let weak = self.downgrade();
        self.prepare_items(
            purge,
            Some(Box::new(move || {
                let Some(component) = Component::upgrade(&weak) else {
                    complete(completion);
                    return;
                };
                let notify = component.downgrade();
                component.update_height(Some(Box::new(move || {
                    if let Some(component) = Component::upgrade(&notify) {
                        component.notify_model_changed();
                    }
                    complete(completion);
                })));
            })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dispatch::{Dispatcher, MainQueue};
    use crate::engine::Engine;
    use mosaic_api::{ComponentKind, Size};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn component(titles: &[&str]) -> (Component, MainQueue) {
        let (dispatcher, queue) = Dispatcher::current();
        let engine = Engine::new(EngineConfig::default(), dispatcher);
        let model = ComponentModel::new(ComponentKind::List)
            .with_items(titles.iter().map(|t| Item::new(*t)).collect());
        (Component::new(model, engine), queue)
    }

    fn titles(component: &Component) -> Vec<String> {
        component.items().into_iter().map(|i| i.title).collect()
    }

    fn indexes(component: &Component) -> Vec<usize> {
        component.items().into_iter().map(|i| i.index).collect()
    }

    fn counter() -> (Arc<AtomicUsize>, Option<Completion>) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = count.clone();
        let completion: Completion = Box::new(move || {
            clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, Some(completion))
    }

    #[tokio::test]
    async fn test_edits_reindex_before_returning() {
        let (component, _queue) = component(&["b", "c"]);

        component.prepend_items(vec![Item::new("a")], None);
        component.append(Item::new("e"), None);
        component.insert(Item::new("d"), 3, None);

        assert_eq!(titles(&component), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(indexes(&component), vec![0, 1, 2, 3, 4]);

        component.delete(0, None);
        assert_eq!(indexes(&component), vec![0, 1, 2, 3]);
        assert_eq!(titles(&component)[0], "b");
    }

    #[tokio::test]
    async fn test_insert_past_end_appends() {
        let (component, _queue) = component(&["a"]);
        component.insert(Item::new("z"), 40, None);
        assert_eq!(titles(&component), vec!["a", "z"]);
    }

    #[tokio::test]
    async fn test_out_of_range_edits_still_complete() {
        let (component, _queue) = component(&["a"]);
        let (count, completion) = counter();
        component.delete(5, completion);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let (count, completion) = counter();
        component.update(Item::new("x"), 5, completion);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(titles(&component), vec!["a"]);
    }

    #[tokio::test]
    async fn test_completion_fires_after_prepare_and_height() {
        let (component, mut queue) = component(&["a"]);
        let (count, completion) = counter();

        component.append(Item::new("b"), completion);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // prepare apply, then height apply
        queue.run_jobs(2).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(component.items().iter().all(|i| i.size != Size::ZERO));
    }

    #[tokio::test]
    async fn test_reload_if_needed_skips_identical_items() {
        let (component, _queue) = component(&["a", "b"]);
        let (count, completion) = counter();

        let changes = component.reload_if_needed(component.items(), completion);
        assert!(changes.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reload_if_needed_reports_changes() {
        let (component, _queue) = component(&["a", "b"]);
        let mut items = component.items();
        items[1].kind = "card".to_string();
        items.push(Item::new("c"));

        let changes = component.reload_if_needed(items, None);
        assert_eq!(changes.kind_changes, vec![1]);
        assert_eq!(changes.insertions, vec![2]);
        assert_eq!(titles(&component), vec!["a", "b", "c"]);
    }
}
