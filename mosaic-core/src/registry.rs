//! View registry: maps item kinds to view factories.
//!
//! The kind string doubles as the view identifier. Lookups are total: a kind
//! with no registered view resolves to the default identifier, and a missing
//! default view resolves to [`PlaceholderView`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use mosaic_api::{Item, Size};

/// A renderable view for one item.
///
/// Views are created on the owning thread but measured on the compute pool,
/// hence `Send`.
pub trait ItemView: Send {
    /// Apply the item to the view's visual state.
    fn configure(&mut self, item: &Item);

    /// Size the view needs to render `item` inside `container`.
    fn compute_size(&self, item: &Item, container: Size) -> Size;
}

/// Produces fresh view instances for one identifier.
pub type ViewFactory = Arc<dyn Fn() -> Box<dyn ItemView> + Send + Sync>;

/// Fallback used when not even a default view is registered.
///
/// Fills the container width unless the item declares its own width, and
/// keeps the item's declared height.
#[derive(Debug, Default)]
pub struct PlaceholderView {
    configured: Option<usize>,
}

impl PlaceholderView {
    /// Index of the last item this view was configured with.
    pub fn configured_index(&self) -> Option<usize> {
        self.configured
    }
}

impl ItemView for PlaceholderView {
    fn configure(&mut self, item: &Item) {
        self.configured = Some(item.index);
    }

    fn compute_size(&self, item: &Item, container: Size) -> Size {
        let width = if item.size.width > 0.0 {
            item.size.width
        } else {
            container.width
        };
        Size::new(width, item.size.height)
    }
}

/// Registry of view factories keyed by identifier.
///
/// Shared process-wide behind an `Arc`. Writes happen at setup time; reads
/// happen from every component, including on the compute pool.
pub struct Registry {
    views: RwLock<HashMap<String, ViewFactory>>,
    default_identifier: String,
}

impl Registry {
    pub fn new(default_identifier: impl Into<String>) -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
            default_identifier: default_identifier.into(),
        }
    }

    /// Register a view for an item kind, replacing any previous entry.
    pub fn register<F, V>(&self, kind: impl Into<String>, factory: F)
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ItemView + 'static,
    {
        let factory: ViewFactory = Arc::new(move || Box::new(factory()) as Box<dyn ItemView>);
        self.views
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind.into(), factory);
    }

    /// Register the fallback view.
    pub fn register_default<F, V>(&self, factory: F)
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ItemView + 'static,
    {
        self.register(self.default_identifier.clone(), factory);
    }

    /// Register the fallback view unless one exists. Returns whether it was
    /// registered.
    pub fn register_default_if_absent<F, V>(&self, factory: F) -> bool
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ItemView + 'static,
    {
        let mut views = self.views.write().unwrap_or_else(PoisonError::into_inner);
        if views.contains_key(&self.default_identifier) {
            return false;
        }
        let factory: ViewFactory = Arc::new(move || Box::new(factory()) as Box<dyn ItemView>);
        views.insert(self.default_identifier.clone(), factory);
        true
    }

    pub fn default_identifier(&self) -> &str {
        &self.default_identifier
    }

    /// Check if a kind has its own view.
    pub fn contains(&self, kind: &str) -> bool {
        self.views
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kind)
    }

    /// Resolve a kind to a view identifier: the kind itself when registered,
    /// otherwise the default identifier.
    pub fn identifier(&self, kind: &str) -> String {
        if !kind.is_empty() && self.contains(kind) {
            kind.to_string()
        } else {
            self.default_identifier.clone()
        }
    }

    /// Create a view for an identifier. Never fails.
    pub fn make(&self, identifier: &str) -> Box<dyn ItemView> {
        let views = self.views.read().unwrap_or_else(PoisonError::into_inner);
        match views
            .get(identifier)
            .or_else(|| views.get(&self.default_identifier))
        {
            Some(factory) => factory(),
            None => {
                tracing::debug!(identifier, "no view registered; using placeholder");
                Box::new(PlaceholderView::default())
            }
        }
    }

    /// All registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .views
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_IDENTIFIER)
    }
}
