//! ItemManager - item sizing and view preparation.
//!
//! Sizing asks the view registered for an item's kind to measure the item
//! against the strategy's item container. Measurement runs on the compute
//! pool and produces a [`Prepared`] result; the component writes it back into
//! the model during the apply phase, which is the only place `Item::size`
//! changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use mosaic_api::{ComponentModel, Item, Size};

use crate::component::Component;
use crate::engine::Engine;
use crate::layout::strategy_for;
use crate::registry::{ItemView, Registry};

/// Sizes computed by [`ItemManager::prepare`], positionally matching the
/// model they were computed from.
#[derive(Default)]
pub(crate) struct Prepared {
    pub(crate) sizes: Vec<Size>,
    pub(crate) header: Option<Size>,
    pub(crate) footer: Option<Size>,
    /// Laid-out children of composite items, keyed by item index.
    pub(crate) composites: HashMap<usize, Vec<Component>>,
}

pub struct ItemManager {
    registry: Arc<Registry>,
    /// One measuring view per identifier.
    prototypes: Mutex<HashMap<String, Box<dyn ItemView>>>,
    /// Views handed back by the host for reuse.
    reuse_pool: Mutex<HashMap<String, Vec<Box<dyn ItemView>>>>,
}

impl ItemManager {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            prototypes: Mutex::new(HashMap::new()),
            reuse_pool: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Measure one item with the prototype view for its kind.
    pub fn measure(&self, item: &Item, container: Size) -> Size {
        let identifier = self.registry.identifier(&item.kind);
        let mut prototypes = self.prototypes.lock().unwrap_or_else(PoisonError::into_inner);
        let view = prototypes
            .entry(identifier)
            .or_insert_with_key(|identifier| self.registry.make(identifier));
        view.compute_size(item, container)
    }

    /// Size of the item at `index`, or zero when out of range.
    ///
    /// Composite items report their stored size; the stacked extent of their
    /// children is only known after a prepare pass.
    pub fn size_for_item(&self, model: &ComponentModel, index: usize, container: Size) -> Size {
        let Some(item) = model.item(index) else {
            return Size::ZERO;
        };
        if item.is_composite() {
            return item.size;
        }
        let item_container = strategy_for(model.kind).item_container(model, container);
        self.measure(item, item_container)
    }

    /// Measure every item plus header and footer.
    ///
    /// Composite items get their children built and laid out synchronously,
    /// stacked top to bottom by content extent; the item takes the stacked
    /// extent as height. Header and footer span the full container width,
    /// outside the item insets.
    pub(crate) fn prepare(&self, model: &ComponentModel, container: Size, engine: &Engine) -> Prepared {
        let item_container = strategy_for(model.kind).item_container(model, container);
        let mut prepared = Prepared {
            sizes: Vec::with_capacity(model.items.len()),
            ..Prepared::default()
        };

        for (position, item) in model.items.iter().enumerate() {
            if item.is_composite() {
                let (size, children) = self.stack_children(item, item_container, container, engine);
                prepared.sizes.push(size);
                prepared.composites.insert(position, children);
            } else {
                prepared.sizes.push(self.measure(item, item_container));
            }
        }

        prepared.header = model.header.as_ref().map(|h| self.measure(h, container));
        prepared.footer = model.footer.as_ref().map(|f| self.measure(f, container));
        prepared
    }

    fn stack_children(
        &self,
        item: &Item,
        item_container: Size,
        container: Size,
        engine: &Engine,
    ) -> (Size, Vec<Component>) {
        let child_container = Size::new(item_container.width, container.height);
        let mut y = 0.0f32;
        let mut children = Vec::with_capacity(item.children.len());

        for (position, model) in item.children.iter().enumerate() {
            let child = Component::builder(model.clone(), engine.clone())
                .index(position)
                .build();
            child.setup(child_container);
            y += child.stack_at(y);
            children.push(child);
        }

        tracing::debug!(children = children.len(), height = y, "stacked composite children");
        (Size::new(item_container.width, y), children)
    }

    /// Take a view for `identifier` from the reuse pool, or create one.
    pub fn dequeue(&self, identifier: &str) -> Box<dyn ItemView> {
        let reused = self
            .reuse_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(identifier)
            .and_then(Vec::pop);
        reused.unwrap_or_else(|| self.registry.make(identifier))
    }

    /// Return a view to the reuse pool.
    pub fn recycle(&self, identifier: &str, view: Box<dyn ItemView>) {
        self.reuse_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(identifier.to_string())
            .or_default()
            .push(view);
    }

    /// Number of pooled views for `identifier`.
    pub fn pooled(&self, identifier: &str) -> usize {
        self.reuse_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .map_or(0, Vec::len)
    }

    /// Drop every cached view so the next pass creates fresh ones.
    pub fn purge(&self) {
        self.prototypes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.reuse_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn cached_prototypes(&self) -> usize {
        self.prototypes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
