//! Engine configuration.
//!
//! One `EngineConfig` is built at startup and shared by every component
//! through the [`Engine`](crate::Engine) handle. Tests build their own.

use std::path::PathBuf;

use chrono::Duration;
use mosaic_api::Size;

/// Identifier used when an item's kind has no registered view.
pub const DEFAULT_IDENTIFIER: &str = "default";

/// Number of days a state cache entry stays valid.
pub const CACHE_TTL_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Registry identifier for the fallback view.
    pub default_identifier: String,
    /// Bounds of the enclosing container. Dynamic heights are clamped to
    /// `container_size.height`; items are measured against its width.
    pub container_size: Size,
    /// Expiry applied to every state cache write.
    pub cache_ttl: Duration,
    /// Items mirrored on each side of an infinitely scrolling carousel.
    pub infinite_scroll_buffer: usize,
    /// Location of the SQLite state cache.
    pub cache_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_identifier: DEFAULT_IDENTIFIER.to_string(),
            container_size: Size::new(375.0, 667.0),
            cache_ttl: Duration::days(CACHE_TTL_DAYS),
            infinite_scroll_buffer: 2,
            cache_path: default_cache_path(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.default_identifier = identifier.into();
        self
    }

    pub fn with_container_size(mut self, size: Size) -> Self {
        self.container_size = size;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_infinite_scroll_buffer(mut self, buffer: usize) -> Self {
        self.infinite_scroll_buffer = buffer;
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }
}

/// `$HOME/.mosaic/state.db`, or a relative path when HOME is unset.
fn default_cache_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".mosaic").join("state.db"),
        Err(_) => PathBuf::from(".mosaic").join("state.db"),
    }
}
