//! Publishing rendered figures for one execution context.
//!
//! Every put is recorded together with the entry it replaced. A failed
//! [`publish`](LivePublisher::publish) undoes its own puts before returning,
//! and [`rollback`](LivePublisher::rollback) undoes everything written since
//! the last [`checkpoint`](LivePublisher::checkpoint), so other clients never
//! observe a render the cell did not display.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::{BOOKKEEPING_SLOT, LiveEntry, LiveRegistry};
use crate::error::Result;
use crate::figure::{FigureId, binding_name};

/// Name of the bookkeeping entry at slot 0.
const BOOKKEEPING_NAME: &str = "plotline";

/// Adapter between one context's figures and the shared registry.
#[derive(Clone)]
pub struct LivePublisher {
    registry: Arc<dyn LiveRegistry>,
    context_id: String,
    /// Figure slots published so far.
    published: BTreeSet<usize>,
    /// Slots published as of the last checkpoint.
    committed: BTreeSet<usize>,
    /// Puts since the last checkpoint, with the entry each one replaced.
    undo: Vec<(usize, Option<LiveEntry>)>,
}

impl LivePublisher {
    pub fn new(registry: Arc<dyn LiveRegistry>, context_id: impl Into<String>) -> Self {
        Self {
            registry,
            context_id: context_id.into(),
            published: BTreeSet::new(),
            committed: BTreeSet::new(),
            undo: Vec::new(),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Slot a figure is published at.
    pub fn slot_for(id: FigureId) -> usize {
        id.number() as usize
    }

    /// Publish rendered figures in order, then refresh the bookkeeping entry.
    ///
    /// All or nothing: if any put fails, the puts already made by this call
    /// are undone and the registry holds what it held before.
    pub fn publish(&mut self, figures: &[(FigureId, String)]) -> Result<Vec<usize>> {
        let mark = self.undo.len();
        let published = self.published.clone();
        match self.publish_in_order(figures) {
            Ok(slots) => Ok(slots),
            Err(err) => {
                self.undo_to(mark);
                self.published = published;
                Err(err)
            }
        }
    }

    fn publish_in_order(&mut self, figures: &[(FigureId, String)]) -> Result<Vec<usize>> {
        let mut slots = Vec::with_capacity(figures.len());
        for (id, encoding) in figures {
            let slot = Self::slot_for(*id);
            self.put_logged(slot, LiveEntry::new(binding_name(*id), encoding.as_str()))?;
            self.published.insert(slot);
            slots.push(slot);
        }

        let bookkeeping = serde_json::json!({
            "context": self.context_id,
            "slots": self.published,
        });
        self.put_logged(
            BOOKKEEPING_SLOT,
            LiveEntry::new(BOOKKEEPING_NAME, serde_json::to_string(&bookkeeping)?),
        )?;

        for ((id, encoding), slot) in figures.iter().zip(&slots) {
            tracing::info!(
                "Published figure {} to {}[{}] ({} bytes)",
                id,
                self.context_id,
                slot,
                encoding.len()
            );
        }
        Ok(slots)
    }

    /// Accept everything published so far.
    pub fn checkpoint(&mut self) {
        self.undo.clear();
        self.committed = self.published.clone();
    }

    /// Restore the registry entries written since the last checkpoint.
    pub fn rollback(&mut self) {
        if !self.undo.is_empty() {
            tracing::debug!(
                "Rolling back {} registry write(s) in {}",
                self.undo.len(),
                self.context_id
            );
        }
        self.undo_to(0);
        self.published = self.committed.clone();
    }

    fn put_logged(&mut self, slot: usize, entry: LiveEntry) -> Result<()> {
        let previous = self.registry.get(&self.context_id, slot)?;
        self.registry.put(&self.context_id, slot, entry)?;
        self.undo.push((slot, previous));
        Ok(())
    }

    fn undo_to(&mut self, mark: usize) {
        let entries: Vec<_> = self.undo.drain(mark..).rev().collect();
        for (slot, previous) in entries {
            let restored = match previous {
                Some(entry) => self.registry.put(&self.context_id, slot, entry),
                None => self.registry.remove(&self.context_id, slot).map(|_| ()),
            };
            if let Err(err) = restored {
                tracing::warn!(
                    "Could not restore {}[{}] after a failed publish: {}",
                    self.context_id,
                    slot,
                    err
                );
            }
        }
    }
}

impl fmt::Debug for LivePublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivePublisher")
            .field("context_id", &self.context_id)
            .field("published", &self.published)
            .finish_non_exhaustive()
    }
}
