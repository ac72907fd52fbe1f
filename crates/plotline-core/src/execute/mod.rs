//! Statement execution for Plotline sessions.
//!
//! # Architecture
//!
//! ```text
//! Session::interpret(statement)
//!     │
//!     ├── Interpreter::interpret(statement, &mut ExecutionContext)
//!     │       │
//!     │       ├── writes side-channel output → OutputSink
//!     │       └── plot / show / close        → FigureRegistry
//!     │                                         └── LivePublisher (angular)
//!     │
//!     └── merge_output(direct result, OutputSink) → ExecutionResult
//! ```
//!
//! # Module Structure
//!
//! - `context` - Per-session state (sink, figures, config, publisher)
//! - `session` - The `Interpreter` seam and the `Session` entry point
//! - `script` - Built-in interpreter for plot scripts
//! - `statement` - Statement parser for the built-in interpreter

mod context;
mod script;
mod session;
mod statement;

pub use context::ExecutionContext;
pub use script::ScriptInterpreter;
pub use session::{Interpreter, Session};
pub use statement::{Arg, Statement, SyntaxError, parse_statement};
