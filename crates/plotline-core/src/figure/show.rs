//! The `show` state machine.
//!
//! ```text
//!            plot                 show (close=false)
//!   (none) ───────► Open ─────────────────────────► ShownLive
//!                    ▲  │                              │  │
//!                    │  │ show (close=true)       plot │  │ show (close=true)
//!                    │  ▼                              │  ▼
//!                    │ Closed ◄─────────────────────── │ Closed
//!                    └─────────────────────────────────┘
//! ```
//!
//! `show` with no live figure writes nothing and leaves the sink kind alone
//! (TEXT after the previous drain). With at least one live figure the kind is
//! set to HTML (ANGULAR when publishing) even if no figure has new content.

use crate::config::ConfigUpdate;
use crate::error::{Error, Result};
use crate::execute::ExecutionContext;
use crate::result::ContentKind;

use super::registry::FigureId;
use super::render::{angular_block, data_uri, html_block, render_svg};

/// What a single `show` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowReport {
    /// Kind declared on the sink, `None` for the no-figure branch.
    pub kind: Option<ContentKind>,
    /// Figures rendered in this call, in render order.
    pub rendered: Vec<FigureId>,
    /// Figures closed at the end of the call.
    pub closed: usize,
}

/// Run `show` against a context.
///
/// `overrides` applies to this call only. Rendering and publishing happen
/// before any figure or sink state changes, and publishing is all or
/// nothing, so a failed call leaves the figure lifecycle and the registry
/// exactly as they were. [`Session`](crate::Session) additionally undoes a
/// successful call when the statement later fails.
pub fn show(ctx: &mut ExecutionContext, overrides: &ConfigUpdate) -> Result<ShowReport> {
    let config = ctx.config.with(overrides);

    if !ctx.figures.has_live() {
        tracing::debug!("show() in {}: no live figures", ctx.id());
        return Ok(ShowReport {
            kind: None,
            rendered: Vec::new(),
            closed: 0,
        });
    }

    let rendered: Vec<(FigureId, String)> = ctx
        .figures
        .pending()
        .map(|figure| {
            let svg = render_svg(figure, config.width, config.height);
            (figure.id(), data_uri(&svg))
        })
        .collect();

    let kind = if config.angular {
        let context_id = ctx.id().to_string();
        let publisher = ctx.publisher.as_mut().ok_or_else(|| {
            Error::Registry(format!(
                "angular output requested but no live registry is attached to context '{context_id}'"
            ))
        })?;
        publisher.publish(&rendered)?;
        ContentKind::Angular
    } else {
        ContentKind::Html
    };

    ctx.sink.set_kind(kind);
    for (id, uri) in &rendered {
        let block = if config.angular {
            angular_block(*id, uri)
        } else {
            html_block(uri)
        };
        ctx.sink.write_text(&block);
    }

    let ids: Vec<FigureId> = rendered.iter().map(|(id, _)| *id).collect();
    for (id, uri) in rendered {
        ctx.figures.mark_rendered(id, uri);
    }
    let closed = if config.close {
        ctx.figures.close_all()
    } else {
        0
    };

    tracing::debug!(
        "show() in {}: {} rendered, {} closed, kind {}",
        ctx.id(),
        ids.len(),
        closed,
        kind
    );

    Ok(ShowReport {
        kind: Some(kind),
        rendered: ids,
        closed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{FigureState, Series};
    use crate::live::{InMemoryLiveRegistry, LiveRegistry};
    use crate::output::merge_output;
    use crate::result::ExecutionResult;
    use std::sync::Arc;

    fn context(close: bool, angular: bool) -> ExecutionContext {
        let mut ctx = ExecutionContext::new("note");
        ctx.configure(&ConfigUpdate {
            interactive: Some(false),
            close: Some(close),
            angular: Some(angular),
            ..Default::default()
        });
        ctx
    }

    fn plot(ctx: &mut ExecutionContext) -> FigureId {
        ctx.figures_mut().plot(Series::from_values(vec![1.0, 2.0, 3.0]))
    }

    fn drain(ctx: &mut ExecutionContext) -> ExecutionResult {
        merge_output(ExecutionResult::empty(), ctx.sink_mut()).unwrap()
    }

    #[test]
    fn test_show_without_figures_is_noop() {
        let mut ctx = context(true, false);
        let report = show(&mut ctx, &ConfigUpdate::default()).unwrap();
        assert_eq!(report.kind, None);
        let result = drain(&mut ctx);
        assert_eq!(result.kind, ContentKind::Text);
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_show_renders_and_closes() {
        let mut ctx = context(true, false);
        let id = plot(&mut ctx);

        let report = show(&mut ctx, &ConfigUpdate::default()).unwrap();
        assert_eq!(report.rendered, vec![id]);
        assert_eq!(report.closed, 1);
        assert_eq!(ctx.figures().get(id).unwrap().state(), FigureState::Closed);

        let result = drain(&mut ctx);
        assert_eq!(result.kind, ContentKind::Html);
        assert!(result.message.contains("data:image/svg+xml;base64,"));
        assert!(result.message.starts_with("<div>"));
    }

    #[test]
    fn test_show_keeps_figure_live_without_close() {
        let mut ctx = context(false, false);
        let id = plot(&mut ctx);
        show(&mut ctx, &ConfigUpdate::default()).unwrap();

        let handle = ctx.figures().get(id).unwrap();
        assert_eq!(handle.state(), FigureState::ShownLive);
        assert!(handle.last_rendered().unwrap().starts_with("data:image/svg+xml"));
    }

    #[test]
    fn test_per_call_close_override() {
        let mut ctx = context(false, false);
        let id = plot(&mut ctx);
        let overrides = ConfigUpdate {
            close: Some(true),
            ..Default::default()
        };
        show(&mut ctx, &overrides).unwrap();
        assert!(!ctx.figures().is_live(id));
        assert!(!ctx.config().close);
    }

    #[test]
    fn test_close_also_closes_unchanged_live_figures() {
        let mut ctx = context(false, false);
        let first = plot(&mut ctx);
        show(&mut ctx, &ConfigUpdate::default()).unwrap();
        drain(&mut ctx);

        ctx.configure(&ConfigUpdate {
            close: Some(true),
            ..Default::default()
        });
        let report = show(&mut ctx, &ConfigUpdate::default()).unwrap();
        assert!(report.rendered.is_empty());
        assert_eq!(report.closed, 1);
        assert!(!ctx.figures().is_live(first));
    }

    #[test]
    fn test_angular_without_registry_fails_cleanly() {
        let mut ctx = context(false, true);
        let id = plot(&mut ctx);

        let err = show(&mut ctx, &ConfigUpdate::default()).unwrap_err();
        assert!(matches!(err, Error::Registry(_)));
        assert_eq!(ctx.figures().get(id).unwrap().state(), FigureState::Open);
        assert!(ctx.sink().is_empty());
    }

    #[test]
    fn test_angular_publishes_rendered_figures() {
        let registry = Arc::new(InMemoryLiveRegistry::new());
        let mut ctx = context(false, true).with_registry(registry.clone());
        let id = plot(&mut ctx);

        show(&mut ctx, &ConfigUpdate::default()).unwrap();
        let result = drain(&mut ctx);
        assert_eq!(result.kind, ContentKind::Angular);

        let entry = registry.get("note", 1).unwrap().unwrap();
        assert_eq!(Some(entry.value.as_str()), ctx.figures().get(id).unwrap().last_rendered());
        assert!(result.message.contains(&entry.value));
        assert!(result.message.contains("{{figure_1}}"));
    }
}
