//! Per-context output sink.
//!
//! Executed code does not return its visual output. It writes bytes into the
//! sink and declares what those bytes are through the sink's kind tag. The
//! session drains the sink once the statement returns.

use std::fmt;
use std::io::{self, Write};

use crate::error::Result;
use crate::result::ContentKind;

/// Observer notified when buffered output is flushed into the sink.
pub trait OutputListener: Send {
    /// Called with each newly flushed chunk.
    fn on_append(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Called with the whole accumulated output after a flush.
    fn on_update(&mut self, _output: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Append-only byte channel with a mutable content-kind tag.
pub struct OutputSink {
    /// Declared kind of the accumulated bytes.
    kind: ContentKind,
    /// Kind restored after every drain.
    default_kind: ContentKind,
    /// Written but not yet flushed.
    pending: Vec<u8>,
    /// Flushed bytes awaiting the merge step.
    flushed: Vec<u8>,
    listener: Option<Box<dyn OutputListener>>,
}

impl OutputSink {
    /// Create an empty sink declaring plain text.
    pub fn new() -> Self {
        Self {
            kind: ContentKind::Text,
            default_kind: ContentKind::Text,
            pending: Vec::new(),
            flushed: Vec::new(),
            listener: None,
        }
    }

    /// Create a sink that reports flushes to `listener`.
    pub fn with_listener(listener: impl OutputListener + 'static) -> Self {
        Self {
            listener: Some(Box::new(listener)),
            ..Self::new()
        }
    }

    /// Current declared kind.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The kind the sink falls back to after each drain.
    pub fn default_kind(&self) -> ContentKind {
        self.default_kind
    }

    /// Declare the kind of the output written so far and from now on.
    pub fn set_kind(&mut self, kind: ContentKind) {
        self.kind = kind;
    }

    /// True when nothing has been written since the last drain.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.flushed.is_empty()
    }

    /// Write text, honouring a leading `%kind ` directive.
    ///
    /// The directive is only recognised at the very start of an empty sink;
    /// anywhere else it is ordinary text.
    pub fn write_text(&mut self, text: &str) {
        let body = if self.is_empty() {
            match parse_directive(text) {
                Some((kind, rest)) => {
                    self.kind = kind;
                    rest
                }
                None => text,
            }
        } else {
            text
        };
        self.pending.extend_from_slice(body.as_bytes());
    }

    /// Move pending bytes into the accumulated output and notify the listener.
    pub fn flush_output(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let chunk = std::mem::take(&mut self.pending);
        self.flushed.extend_from_slice(&chunk);

        if let Some(listener) = self.listener.as_mut() {
            listener.on_append(&chunk)?;
            listener.on_update(&self.flushed)?;
        }
        Ok(())
    }

    /// Take the accumulated bytes and their kind, resetting the sink.
    ///
    /// Pending (unflushed) bytes are not part of the drained output; call
    /// [`flush_output`](Self::flush_output) first.
    pub fn drain(&mut self) -> (ContentKind, Vec<u8>) {
        let kind = std::mem::replace(&mut self.kind, self.default_kind);
        (kind, std::mem::take(&mut self.flushed))
    }

    /// Discard everything, flushed or not, and reset the kind.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.flushed.clear();
        self.kind = self.default_kind;
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink")
            .field("kind", &self.kind)
            .field("pending", &self.pending.len())
            .field("flushed", &self.flushed.len())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_output().map_err(io::Error::other)
    }
}

/// Split `%kind rest` into its kind and body.
fn parse_directive(text: &str) -> Option<(ContentKind, &str)> {
    let rest = text.strip_prefix('%')?;
    let end = rest.find(char::is_whitespace)?;
    let kind = rest[..end].parse().ok()?;
    let body = &rest[end..];
    // Exactly one separator character belongs to the directive.
    let sep = body.chars().next().map_or(0, char::len_utf8);
    Some((kind, &body[sep..]))
}
