//! Engine error types.
//!
//! These stay inside the engine: the public component API absorbs them and
//! logs, because every failure it can hit is recoverable by falling back to
//! a default or a cache miss.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode cache payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode cache payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
