//! Live-object registry contract and the figure publisher.
//!
//! The registry is the one resource shared between execution contexts. It is
//! keyed by `(context_id, slot)`; slot 0 of every context is reserved for
//! bookkeeping and figure `n` is published at slot `n`.
//!
//! ```text
//! show() ──► LivePublisher ──put──► LiveRegistry ◄──get_all── other clients
//!               (per context)        (shared, Send + Sync)
//! ```

mod memory;
mod publisher;

pub use memory::InMemoryLiveRegistry;
pub use publisher::LivePublisher;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Slot holding per-context bookkeeping.
pub const BOOKKEEPING_SLOT: usize = 0;

/// First slot visible to users.
pub const FIRST_FIGURE_SLOT: usize = 1;

/// A named value stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEntry {
    pub name: String,
    pub value: String,
}

impl LiveEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Which entries of a context [`LiveRegistry::get_all`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFilter<'a> {
    /// Every entry.
    All,
    /// Entries whose name starts with the given prefix.
    Named(&'a str),
}

impl RegistryFilter<'_> {
    pub fn matches(&self, entry: &LiveEntry) -> bool {
        match self {
            RegistryFilter::All => true,
            RegistryFilter::Named(prefix) => entry.name.starts_with(prefix),
        }
    }
}

/// Shared key-value store synchronising rendered artifacts to observers.
///
/// Implementations must tolerate concurrent readers and writers.
pub trait LiveRegistry: Send + Sync {
    /// Store `entry` at `(context_id, slot)`, replacing any previous value.
    fn put(&self, context_id: &str, slot: usize, entry: LiveEntry) -> Result<()>;

    /// Entry at `(context_id, slot)`.
    fn get(&self, context_id: &str, slot: usize) -> Result<Option<LiveEntry>>;

    /// Entries of a context ordered by slot.
    fn get_all(&self, context_id: &str, filter: RegistryFilter<'_>) -> Result<Vec<LiveEntry>>;

    /// Remove the entry at `(context_id, slot)`, returning it.
    fn remove(&self, context_id: &str, slot: usize) -> Result<Option<LiveEntry>>;
}
