//! Folding side-channel output into the direct result.

use crate::error::Result;
use crate::result::ExecutionResult;

use super::sink::OutputSink;

/// Combine a statement's direct result with what it wrote to the sink.
///
/// The sink is flushed and drained. When the direct message is non-empty it
/// is appended after the sink text and its kind wins; otherwise the sink text
/// stands alone under the sink's declared kind. Status always comes from
/// `raw`.
///
/// A flush failure is returned as-is. No partial result is produced.
pub fn merge_output(raw: ExecutionResult, sink: &mut OutputSink) -> Result<ExecutionResult> {
    sink.flush_output()?;
    let (sink_kind, bytes) = sink.drain();
    let mut message = String::from_utf8_lossy(&bytes).into_owned();

    let kind = if raw.message.is_empty() {
        sink_kind
    } else {
        message.push_str(&raw.message);
        raw.kind
    };

    Ok(ExecutionResult {
        status: raw.status,
        kind,
        message,
    })
}
