//! Core engine for Plotline notebook sessions.
//!
//! This crate provides:
//! - Side-channel output capture and result merging
//! - The figure lifecycle state machine behind `show`
//! - Publishing rendered figures to a shared live-object registry
//! - A session entry point plus a small built-in plot script interpreter

pub mod config;
pub mod error;
pub mod execute;
pub mod figure;
pub mod live;
pub mod output;
pub mod result;

pub use config::{ConfigUpdate, ShowConfig};
pub use error::{Error, Result};
pub use execute::{ExecutionContext, Interpreter, ScriptInterpreter, Session};
pub use figure::{FigureHandle, FigureId, FigureRegistry, FigureState, ShowReport};
pub use live::{InMemoryLiveRegistry, LiveEntry, LivePublisher, LiveRegistry, RegistryFilter};
pub use output::{OutputListener, OutputSink, merge_output};
pub use result::{ContentKind, ExecutionResult, Status};
