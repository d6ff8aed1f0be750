//! Delegate registration.
//!
//! Hosts observe a component by subscribing a delegate and keep the returned
//! handle to revoke it later. There are no ambient back-pointers: a delegate
//! stays registered until its handle is passed to `unsubscribe`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use mosaic_api::Item;

use crate::component::Component;

/// Receives selection, focus and model-change notifications.
///
/// Callbacks run on the owning thread.
pub trait ComponentDelegate: Send + Sync {
    fn did_select_item(&self, _component: &Component, _item: &Item) {}

    fn did_change_focus(&self, _component: &Component, _focused: Option<usize>) {}

    /// The component's items changed and the change has been applied.
    fn did_change_model(&self, _component: &Component) {}
}

/// Revocable registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(ListenerHandle, Arc<dyn ComponentDelegate>)>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, delegate: Arc<dyn ComponentDelegate>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((handle, delegate));
        handle
    }

    pub(crate) fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(h, _)| *h != handle);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call `f` for every registered delegate.
    ///
    /// Iterates a snapshot so delegates may subscribe or unsubscribe from
    /// inside a callback.
    pub(crate) fn for_each(&self, mut f: impl FnMut(&dyn ComponentDelegate)) {
        let snapshot: Vec<Arc<dyn ComponentDelegate>> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, d)| d.clone())
            .collect();
        for delegate in snapshot {
            f(delegate.as_ref());
        }
    }
}
