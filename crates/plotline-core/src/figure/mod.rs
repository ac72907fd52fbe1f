//! Figure lifecycle for Plotline contexts.
//!
//! This module provides:
//! - [`FigureRegistry`] tracking the figures of one context
//! - The [`show`] state machine deciding what gets rendered and emitted
//! - Deterministic SVG rendering of figures

mod registry;
mod render;
mod show;

pub use registry::{FigureHandle, FigureId, FigureRegistry, FigureState, Series};
pub use render::{COLOR_CYCLE, binding_name, data_uri, render_svg};
pub use show::{ShowReport, show};
