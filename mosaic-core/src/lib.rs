//! Mosaic Core - the component reconciliation engine.
//!
//! This crate turns declarative component models into measured, laid-out
//! views:
//! - Registry (item kind to view factory, with a default fallback)
//! - ItemManager (item sizing, view prototypes and reuse)
//! - Layout strategies (list, grid, carousel, row)
//! - Component (height, indexes and structural edits over one model)
//! - Bridge (answers toolkit data-source and delegate queries)
//! - State cache (expiring model snapshots in memory or SQLite)
//!
//! Work that derives a value and then mutates a view is split in two: the
//! compute phase runs on tokio's blocking pool, the apply phase on whichever
//! thread drains the [`MainQueue`].

pub mod bridge;
pub mod cache;
pub mod component;
pub mod composite;
pub mod config;
pub mod delegate;
pub mod dispatch;
pub mod layout;
pub mod manager;
pub mod registry;
pub mod view;

mod engine;
mod error;

pub use bridge::{ComponentBridge, DataSource};
pub use cache::{CacheStore, MemoryStore, SqliteStore, StateCache};
pub use component::{Component, ComponentBuilder};
pub use composite::CompositeMap;
pub use config::EngineConfig;
pub use delegate::{ComponentDelegate, ListenerHandle};
pub use dispatch::{Completion, Dispatcher, MainQueue};
pub use engine::Engine;
pub use error::CacheError;
pub use layout::{LayoutStrategy, strategy_for};
pub use manager::ItemManager;
pub use registry::{ItemView, PlaceholderView, Registry};
pub use view::ScrollView;

pub use mosaic_api as api;
