//! Side-channel output handling.
//!
//! This module provides:
//! - The per-context [`OutputSink`] that executed code writes into
//! - Listener hooks notified whenever the sink is flushed
//! - The merge step that folds the sink into the statement's direct result

mod merge;
mod sink;

pub use merge::merge_output;
pub use sink::{OutputListener, OutputSink};
