//! The notebook-facing entry point.

use crate::error::Result;
use crate::output::merge_output;
use crate::result::ExecutionResult;

use super::context::ExecutionContext;
use super::script::ScriptInterpreter;

/// A script engine evaluating one statement at a time.
///
/// Returning `Err` signals a framework fault (I/O, environment,
/// configuration). Failures of the statement itself are reported as a
/// result with `Status::Error`.
pub trait Interpreter {
    fn interpret(
        &mut self,
        statement: &str,
        ctx: &mut ExecutionContext,
    ) -> Result<ExecutionResult>;
}

/// An interpreter bound to its execution context.
///
/// Every call runs the statement to completion, then drains the context's
/// output sink into the returned result.
#[derive(Debug)]
pub struct Session<I = ScriptInterpreter> {
    interpreter: I,
    context: ExecutionContext,
    executed: usize,
}

impl Session<ScriptInterpreter> {
    /// A session running the built-in plot script language.
    pub fn script(context: ExecutionContext) -> Self {
        Self::new(ScriptInterpreter::new(), context)
    }
}

impl<I: Interpreter> Session<I> {
    pub fn new(interpreter: I, context: ExecutionContext) -> Self {
        Self {
            interpreter,
            context,
            executed: 0,
        }
    }

    /// Evaluate one statement and return its merged result.
    ///
    /// A framework error, including a flush failure during the merge, rolls
    /// the context back to where it was before the statement: figures are
    /// restored, registry writes are undone and the sink is cleared.
    pub fn interpret(&mut self, statement: &str) -> Result<ExecutionResult> {
        self.executed += 1;
        let figures = self.context.checkpoint();
        let merged = self
            .interpreter
            .interpret(statement, &mut self.context)
            .and_then(|raw| merge_output(raw, &mut self.context.sink));

        if let Err(err) = &merged {
            tracing::error!(
                "Statement {} in {} failed: {}",
                self.executed,
                self.context.id(),
                err
            );
            self.context.rollback(figures);
        }
        merged
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.context
    }

    /// Number of statements evaluated so far, including failed ones.
    pub fn statements_executed(&self) -> usize {
        self.executed
    }

    pub fn into_context(self) -> ExecutionContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::figure::Series;
    use crate::output::OutputListener;
    use crate::result::{ContentKind, Status};
    use std::io;

    /// Interpreter replaying canned side-channel output and direct results.
    struct Canned {
        sink_kind: ContentKind,
        sink_text: &'static str,
        direct: ExecutionResult,
    }

    impl Interpreter for Canned {
        fn interpret(
            &mut self,
            _statement: &str,
            ctx: &mut ExecutionContext,
        ) -> Result<ExecutionResult> {
            ctx.sink_mut().set_kind(self.sink_kind);
            ctx.sink_mut().write_text(self.sink_text);
            Ok(self.direct.clone())
        }
    }

    struct Raising;

    impl Interpreter for Raising {
        fn interpret(
            &mut self,
            _statement: &str,
            ctx: &mut ExecutionContext,
        ) -> Result<ExecutionResult> {
            ctx.sink_mut().write_text("half-written");
            Err(Error::Io(io::Error::other("interpreter pipe closed")))
        }
    }

    #[test]
    fn test_sink_text_precedes_direct_message() {
        let mut session = Session::new(
            Canned {
                sink_kind: ContentKind::Html,
                sink_text: "<p>side</p>",
                direct: ExecutionResult::text("direct"),
            },
            ExecutionContext::new("note"),
        );
        let result = session.interpret("anything").unwrap();
        assert_eq!(result.message, "<p>side</p>direct");
        assert_eq!(result.kind, ContentKind::Text);
        assert_eq!(result.status, Status::Success);
    }

    #[test]
    fn test_sink_kind_used_without_direct_message() {
        let mut session = Session::new(
            Canned {
                sink_kind: ContentKind::Table,
                sink_text: "a\tb\n1\t2\n",
                direct: ExecutionResult::empty(),
            },
            ExecutionContext::new("note"),
        );
        let result = session.interpret("anything").unwrap();
        assert_eq!(result.kind, ContentKind::Table);
        assert_eq!(session.statements_executed(), 1);
    }

    #[test]
    fn test_interpreter_fault_clears_sink() {
        let mut session = Session::new(Raising, ExecutionContext::new("note"));
        assert!(session.interpret("x").is_err());
        assert!(session.context().sink().is_empty());
    }

    #[test]
    fn test_interpreter_fault_restores_figures() {
        struct PlotThenFail;
        impl Interpreter for PlotThenFail {
            fn interpret(
                &mut self,
                _statement: &str,
                ctx: &mut ExecutionContext,
            ) -> Result<ExecutionResult> {
                ctx.figures_mut().plot(Series::from_values(vec![1.0, 2.0]));
                Err(Error::Io(io::Error::other("engine crashed")))
            }
        }

        let mut session = Session::new(PlotThenFail, ExecutionContext::new("note"));
        assert!(session.interpret("x").is_err());
        assert!(!session.context().figures().has_live());
    }

    #[test]
    fn test_flush_failure_surfaces_and_clears() {
        struct Rejecting;
        impl OutputListener for Rejecting {
            fn on_append(&mut self, _chunk: &[u8]) -> io::Result<()> {
                Err(io::Error::other("listener rejected output"))
            }
        }

        let context = ExecutionContext::new("note").with_listener(Rejecting);
        let mut session = Session::script(context);
        let err = session.interpret("print('hi')").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(session.context().sink().is_empty());
    }
}
