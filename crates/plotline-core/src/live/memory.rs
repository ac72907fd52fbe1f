//! In-process live registry.

use std::collections::BTreeMap;
use std::sync::RwLock;

use rustc_hash::FxHashMap;

use super::{LiveEntry, LiveRegistry, RegistryFilter};
use crate::error::{Error, Result};

type Slots = BTreeMap<usize, LiveEntry>;

/// Live registry held in memory, shareable across threads via `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryLiveRegistry {
    contexts: RwLock<FxHashMap<String, Slots>>,
}

impl InMemoryLiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context ids that have at least one entry, sorted.
    pub fn contexts(&self) -> Result<Vec<String>> {
        let contexts = self.contexts.read().map_err(|_| poisoned())?;
        let mut ids: Vec<String> = contexts.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

fn poisoned() -> Error {
    Error::Registry("registry lock poisoned".to_string())
}

impl LiveRegistry for InMemoryLiveRegistry {
    fn put(&self, context_id: &str, slot: usize, entry: LiveEntry) -> Result<()> {
        let mut contexts = self.contexts.write().map_err(|_| poisoned())?;
        contexts
            .entry(context_id.to_string())
            .or_default()
            .insert(slot, entry);
        Ok(())
    }

    fn get(&self, context_id: &str, slot: usize) -> Result<Option<LiveEntry>> {
        let contexts = self.contexts.read().map_err(|_| poisoned())?;
        Ok(contexts
            .get(context_id)
            .and_then(|slots| slots.get(&slot))
            .cloned())
    }

    fn get_all(&self, context_id: &str, filter: RegistryFilter<'_>) -> Result<Vec<LiveEntry>> {
        let contexts = self.contexts.read().map_err(|_| poisoned())?;
        Ok(contexts
            .get(context_id)
            .map(|slots| {
                slots
                    .values()
                    .filter(|entry| filter.matches(entry))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn remove(&self, context_id: &str, slot: usize) -> Result<Option<LiveEntry>> {
        let mut contexts = self.contexts.write().map_err(|_| poisoned())?;
        let Some(slots) = contexts.get_mut(context_id) else {
            return Ok(None);
        };
        let removed = slots.remove(&slot);
        if slots.is_empty() {
            contexts.remove(context_id);
        }
        Ok(removed)
    }
}
