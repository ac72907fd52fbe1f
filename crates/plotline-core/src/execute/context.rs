//! Execution context for a statement stream.
//!
//! A context owns everything one session mutates: its output sink, its
//! figures and its sticky configuration. Contexts never share these; the
//! only shared resource is the live registry behind the publisher.

use std::sync::Arc;

use crate::config::{ConfigUpdate, ShowConfig};
use crate::figure::FigureRegistry;
use crate::live::{LivePublisher, LiveRegistry};
use crate::output::{OutputListener, OutputSink};

/// State owned by one execution context.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Context identity (also the live registry key).
    id: String,
    pub(crate) sink: OutputSink,
    pub(crate) figures: FigureRegistry,
    pub(crate) config: ShowConfig,
    pub(crate) publisher: Option<LivePublisher>,
}

impl ExecutionContext {
    /// Create a context with default configuration and no live registry.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sink: OutputSink::new(),
            figures: FigureRegistry::new(),
            config: ShowConfig::default(),
            publisher: None,
        }
    }

    /// Attach the shared live registry.
    pub fn with_registry(mut self, registry: Arc<dyn LiveRegistry>) -> Self {
        self.publisher = Some(LivePublisher::new(registry, self.id.clone()));
        self
    }

    /// Start from a non-default configuration.
    pub fn with_config(mut self, config: ShowConfig) -> Self {
        self.config = config;
        self
    }

    /// Report sink flushes to `listener`.
    pub fn with_listener(mut self, listener: impl OutputListener + 'static) -> Self {
        self.sink = OutputSink::with_listener(listener);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Apply a sticky configuration change.
    pub fn configure(&mut self, update: &ConfigUpdate) {
        self.config.apply(update);
        tracing::debug!("Context {} configured: {:?}", self.id, self.config);
    }

    pub fn figures(&self) -> &FigureRegistry {
        &self.figures
    }

    pub fn figures_mut(&mut self) -> &mut FigureRegistry {
        &mut self.figures
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut OutputSink {
        &mut self.sink
    }

    pub fn publisher(&self) -> Option<&LivePublisher> {
        self.publisher.as_ref()
    }

    /// Mark the current state as committed, returning the figures to restore
    /// if the next statement fails.
    pub(crate) fn checkpoint(&mut self) -> FigureRegistry {
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.checkpoint();
        }
        self.figures.clone()
    }

    /// Undo a failed statement: restore the figures, undo its registry
    /// writes and drop its output.
    pub(crate) fn rollback(&mut self, figures: FigureRegistry) {
        self.figures = figures;
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.rollback();
        }
        self.sink.clear();
    }
}
