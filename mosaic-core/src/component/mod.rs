//! Component - coordinates one model, its live view and its item manager.
//!
//! A `Component` is a cheap, cloneable handle. The model and view live behind
//! a mutex and are only mutated on the owning thread: synchronous `*_now`
//! passes run inline, asynchronous passes compute on the blocking pool and
//! apply through the main queue. Scheduled apply phases hold a weak handle,
//! so a component released mid-flight skips the mutation but still signals
//! the caller's completion.

mod mutation;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use mosaic_api::{ComponentKind, ComponentModel, Item, Rect, ScrollDirection, Size};

use crate::cache::StateCache;
use crate::composite::CompositeMap;
use crate::delegate::{ComponentDelegate, ListenerHandle, Listeners};
use crate::dispatch::{Completion, complete};
use crate::engine::Engine;
use crate::layout::{snap_offset, strategy_for};
use crate::manager::{ItemManager, Prepared};
use crate::view::ScrollView;

#[derive(Clone)]
pub struct Component {
    shared: Arc<Shared>,
}

struct Shared {
    engine: Engine,
    manager: Arc<ItemManager>,
    composites: Arc<CompositeMap>,
    listeners: Listeners,
    state_cache: Option<StateCache>,
    state: Mutex<State>,
}

struct State {
    model: ComponentModel,
    view: ScrollView,
    index: usize,
    /// Bounds of the enclosing container.
    container: Size,
    focused: Option<usize>,
}

/// Builder for [`Component`].
pub struct ComponentBuilder {
    model: ComponentModel,
    engine: Engine,
    index: usize,
    composites: Option<Arc<CompositeMap>>,
    cache_key: Option<String>,
}

impl ComponentBuilder {
    /// Position of the component within its host.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Share a composite map with sibling components.
    pub fn composites(mut self, composites: Arc<CompositeMap>) -> Self {
        self.composites = Some(composites);
        self
    }

    /// Restore from, and later persist to, this state cache key.
    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn build(self) -> Component {
        let state_cache = self.cache_key.map(|key| self.engine.state_cache(key));
        let mut model = match state_cache.as_ref().and_then(StateCache::load) {
            Some(cached) => {
                tracing::debug!(key = ?state_cache.as_ref().map(StateCache::key), "restored component from cache");
                cached
            }
            None => self.model,
        };
        model.refresh_indexes();

        let container = self.engine.config().container_size;
        let manager = Arc::new(ItemManager::new(self.engine.registry().clone()));

        Component {
            shared: Arc::new(Shared {
                manager,
                composites: self.composites.unwrap_or_default(),
                listeners: Listeners::default(),
                state_cache,
                state: Mutex::new(State {
                    model,
                    view: ScrollView::new(),
                    index: self.index,
                    container,
                    focused: None,
                }),
                engine: self.engine,
            }),
        }
    }
}

impl Component {
    pub fn new(model: ComponentModel, engine: Engine) -> Self {
        Self::builder(model, engine).build()
    }

    pub fn builder(model: ComponentModel, engine: Engine) -> ComponentBuilder {
        ComponentBuilder {
            model,
            engine,
            index: 0,
            composites: None,
            cache_key: None,
        }
    }

    /// Restore the model cached under `key`, or start from `fallback`.
    pub fn from_cache(key: impl Into<String>, fallback: ComponentModel, engine: Engine) -> Self {
        Self::builder(fallback, engine).cache_key(key).build()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn downgrade(&self) -> Weak<Shared> {
        Arc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    /// Whether both handles refer to the same component.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn engine(&self) -> &Engine {
        &self.shared.engine
    }

    pub fn manager(&self) -> &ItemManager {
        &self.shared.manager
    }

    pub fn composites(&self) -> &Arc<CompositeMap> {
        &self.shared.composites
    }

    pub fn index(&self) -> usize {
        self.lock().index
    }

    pub fn set_index(&self, index: usize) {
        self.lock().index = index;
    }

    /// Snapshot of the model.
    pub fn model(&self) -> ComponentModel {
        self.lock().model.clone()
    }

    pub fn kind(&self) -> ComponentKind {
        self.lock().model.kind
    }

    pub fn len(&self) -> usize {
        self.lock().model.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item(&self, index: usize) -> Option<Item> {
        self.lock().model.item(index).cloned()
    }

    pub fn items(&self) -> Vec<Item> {
        self.lock().model.items.clone()
    }

    pub fn header(&self) -> Option<Item> {
        self.lock().model.header.clone()
    }

    pub fn footer(&self) -> Option<Item> {
        self.lock().model.footer.clone()
    }

    /// View identifier for the item at `index`.
    ///
    /// Unregistered kinds and out-of-range indexes resolve to the registry's
    /// default identifier.
    pub fn identifier(&self, index: usize) -> String {
        let kind = self.lock().model.item(index).map(|item| item.kind.clone());
        let registry = self.shared.engine.registry();
        match kind {
            Some(kind) => registry.identifier(&kind),
            None => registry.default_identifier().to_string(),
        }
    }

    /// Snapshot of the live view.
    pub fn view(&self) -> ScrollView {
        self.lock().view.clone()
    }

    pub fn frame(&self) -> Rect {
        self.lock().view.frame
    }

    /// Place this component as a stacked child whose top edge sits at `y`.
    ///
    /// The frame takes the full content extent, not the clamped height, so
    /// insets and undeclared grid heights still count. Returns that extent.
    pub(crate) fn stack_at(&self, y: f32) -> f32 {
        let mut state = self.lock();
        let extent = state.view.content_size.height;
        state.view.frame.x = 0.0;
        state.view.frame.y = y;
        state.view.frame.height = extent;
        extent
    }

    /// Whether the host should pad the item list with wrapped copies.
    pub fn infinite_scrolling(&self) -> bool {
        let state = self.lock();
        state.model.layout.infinite_scrolling
            && state.model.kind == ComponentKind::Carousel
            && state.model.items.len() > 1
    }

    pub fn container_size(&self) -> Size {
        self.lock().container
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.lock().focused
    }

    /// Children laid out for a composite item.
    pub fn children(&self, item_index: usize) -> Option<Vec<Component>> {
        self.shared.composites.resolve(self.index(), item_index)
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Configure the view for `container`, size every item and apply the
    /// resulting height. Runs inline.
    pub fn setup(&self, container: Size) {
        {
            let mut state = self.lock();
            state.container = container;
            let State { model, view, .. } = &mut *state;
            strategy_for(model.kind).setup(view, model, container);
            if !model.layout.dynamic_height {
                view.frame.height = model.size.height;
            }
        }
        self.prepare_items_now(false);
        self.update_height_now();
    }

    /// Re-run the layout pass against new container bounds.
    pub fn layout(&self, container: Size) {
        let mut state = self.lock();
        state.container = container;
        state.view.frame.width = container.width;
        apply_layout(&mut state);
    }

    /// Height the component wants for its current items.
    ///
    /// With a fixed height this is the current frame height.
    pub fn computed_height(&self) -> f32 {
        let state = self.lock();
        content_height(&state.model, state.container, state.view.frame.height)
    }

    /// Measured size of one item; zero when out of range.
    pub fn size_for_item(&self, index: usize) -> Size {
        let state = self.lock();
        self.shared
            .manager
            .size_for_item(&state.model, index, state.container)
    }

    /// Snap a proposed scroll offset to the pagination mode.
    pub fn target_content_offset(&self, proposed: f32) -> f32 {
        let state = self.lock();
        let viewport = match state.view.scroll_direction {
            ScrollDirection::Horizontal => state.view.frame.width,
            ScrollDirection::Vertical => state.view.frame.height,
        };
        snap_offset(
            state.model.interaction.paginate,
            &state.view.item_frames,
            state.view.scroll_direction,
            proposed,
            viewport,
        )
    }

    pub fn scroll_to(&self, offset: f32) {
        self.lock().view.scroll_to(offset);
    }

    // -------------------------------------------------------------------------
    // Two-phase passes
    // -------------------------------------------------------------------------

    /// Recompute the height off-thread, then clamp it to the container and
    /// apply it to the frame.
    pub fn update_height(&self, completion: Option<Completion>) {
        let (model, container, current) = {
            let state = self.lock();
            (state.model.clone(), state.container, state.view.frame.height)
        };
        let weak = self.downgrade();
        self.shared.engine.dispatcher().two_phase(
            move || content_height(&model, container, current),
            move |height| {
                match (Component::upgrade(&weak), height) {
                    (Some(component), Some(height)) => component.apply_height(height),
                    (None, _) => tracing::debug!("component released before height was applied"),
                    (Some(_), None) => {}
                }
                complete(completion);
            },
        );
    }

    pub fn update_height_now(&self) {
        let height = self.computed_height();
        self.apply_height(height);
    }

    fn apply_height(&self, height: f32) {
        let mut state = self.lock();
        let height = height.min(state.container.height).max(0.0);
        state.view.frame.height = height;
    }

    /// Renumber items off the interactive path.
    pub fn refresh_indexes(&self, completion: Option<Completion>) {
        let weak = self.downgrade();
        self.shared.engine.dispatcher().two_phase(
            || (),
            move |ready: Option<()>| {
                match (Component::upgrade(&weak), ready) {
                    (Some(component), Some(())) => component.refresh_indexes_now(),
                    (None, _) => tracing::debug!("component released before indexes were refreshed"),
                    (Some(_), None) => {}
                }
                complete(completion);
            },
        );
    }

    pub fn refresh_indexes_now(&self) {
        let mut state = self.lock();
        state.model.refresh_indexes();
        state.view.reload();
    }

    /// Height first, then indexes; `completion` fires after both.
    pub fn update_height_and_indexes(&self, completion: Option<Completion>) {
        let weak = self.downgrade();
        self.update_height(Some(Box::new(move || match Component::upgrade(&weak) {
            Some(component) => component.refresh_indexes(completion),
            None => complete(completion),
        })));
    }

    /// Measure every item off-thread and write the sizes back.
    ///
    /// `purge` drops cached views first so the next render creates fresh ones.
    pub fn prepare_items(&self, purge: bool, completion: Option<Completion>) {
        if purge {
            self.shared.manager.purge();
        }
        let (model, container) = {
            let state = self.lock();
            (state.model.clone(), state.container)
        };
        let manager = self.shared.manager.clone();
        let engine = self.shared.engine.clone();
        let weak = self.downgrade();
        self.shared.engine.dispatcher().two_phase(
            move || manager.prepare(&model, container, &engine),
            move |prepared| {
                match (Component::upgrade(&weak), prepared) {
                    (Some(component), Some(prepared)) => component.apply_prepared(prepared),
                    (None, _) => tracing::debug!("component released before items were prepared"),
                    (Some(_), None) => {}
                }
                complete(completion);
            },
        );
    }

    pub fn prepare_items_now(&self, purge: bool) {
        if purge {
            self.shared.manager.purge();
        }
        let (model, container) = {
            let state = self.lock();
            (state.model.clone(), state.container)
        };
        let prepared = self
            .shared
            .manager
            .prepare(&model, container, &self.shared.engine);
        self.apply_prepared(prepared);
    }

    fn apply_prepared(&self, prepared: Prepared) {
        let index = {
            let mut state = self.lock();
            if prepared.sizes.len() != state.model.items.len() {
                tracing::debug!(
                    prepared = prepared.sizes.len(),
                    items = state.model.items.len(),
                    "item count changed during prepare"
                );
            }
            for (item, size) in state.model.items.iter_mut().zip(&prepared.sizes) {
                item.size = *size;
            }
            if let (Some(header), Some(size)) = (state.model.header.as_mut(), prepared.header) {
                header.size = size;
            }
            if let (Some(footer), Some(size)) = (state.model.footer.as_mut(), prepared.footer) {
                footer.size = size;
            }
            apply_layout(&mut state);
            state.view.reload();
            state.index
        };
        self.shared.composites.replace(index, prepared.composites);
    }

    // -------------------------------------------------------------------------
    // Delegates
    // -------------------------------------------------------------------------

    pub fn subscribe(&self, delegate: Arc<dyn ComponentDelegate>) -> ListenerHandle {
        self.shared.listeners.subscribe(delegate)
    }

    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        self.shared.listeners.unsubscribe(handle)
    }

    /// Notify delegates that the item at `index` was selected. Returns false,
    /// without notifying, when the index is out of range.
    pub(crate) fn select(&self, index: usize) -> bool {
        let Some(item) = self.item(index) else {
            tracing::debug!(index, "selection out of range");
            return false;
        };
        self.shared
            .listeners
            .for_each(|delegate| delegate.did_select_item(self, &item));
        true
    }

    /// Move focus; an out-of-range index clears it.
    pub(crate) fn focus(&self, index: Option<usize>) {
        let focused = {
            let mut state = self.lock();
            let len = state.model.items.len();
            state.focused = index.filter(|i| *i < len);
            state.focused
        };
        self.shared
            .listeners
            .for_each(|delegate| delegate.did_change_focus(self, focused));
    }

    fn notify_model_changed(&self) {
        self.shared
            .listeners
            .for_each(|delegate| delegate.did_change_model(self));
    }

    // -------------------------------------------------------------------------
    // State cache
    // -------------------------------------------------------------------------

    pub fn cache_key(&self) -> Option<&str> {
        self.shared.state_cache.as_ref().map(StateCache::key)
    }

    /// Persist the current model under the component's cache key.
    pub fn cache(&self) {
        match &self.shared.state_cache {
            Some(cache) => cache.cache(&self.model()),
            None => tracing::debug!("component has no cache key; skipping cache"),
        }
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.shared.state_cache {
            cache.clear();
        }
    }
}

/// Content-driven height, or `current` when the model fixes its height.
fn content_height(model: &ComponentModel, container: Size, current: f32) -> f32 {
    if !model.layout.dynamic_height {
        return current;
    }
    strategy_for(model.kind).compute_height(model, container)
}

fn apply_layout(state: &mut State) {
    let pass = strategy_for(state.model.kind).layout(&state.model, state.container);
    state.view.item_frames = pass.frames;
    state.view.content_size = pass.content_size;
    let max = state.view.max_offset();
    match state.view.scroll_direction {
        ScrollDirection::Vertical => state.view.content_offset.y = state.view.content_offset.y.min(max),
        ScrollDirection::Horizontal => state.view.content_offset.x = state.view.content_offset.x.min(max),
    }
}
