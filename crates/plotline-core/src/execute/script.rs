//! Built-in interpreter for plot scripts.
//!
//! Understands the statements below and nothing else. Unknown names and bad
//! arguments are script errors; malformed configuration is a framework
//! error.
//!
//! | statement                           | effect                                   |
//! |-------------------------------------|------------------------------------------|
//! | `configure(k=v, ...)`               | sticky configuration change              |
//! | `figure()`                          | start a new current figure               |
//! | `plot([y...])`, `plot([x], [y])`    | add a series to the current figure       |
//! | `show()`, `show(close=False)`       | run the show state machine               |
//! | `close()`, `close("all")`, `close(n)` | close figures                          |
//! | `print(...)`                        | write a line to the output sink          |

use crate::config::ConfigUpdate;
use crate::error::{Error, Result};
use crate::figure::{FigureId, Series, show};
use crate::result::ExecutionResult;

use super::context::ExecutionContext;
use super::session::Interpreter;
use super::statement::{Arg, Statement, parse_number_list, parse_statement, parse_string};

/// Interpreter for the plot script language. Stateless; all state lives in
/// the [`ExecutionContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptInterpreter;

impl ScriptInterpreter {
    pub fn new() -> Self {
        Self
    }

    fn call(
        &self,
        name: &str,
        args: &[Arg],
        ctx: &mut ExecutionContext,
    ) -> Result<ExecutionResult> {
        match name {
            "configure" | "configure_mpl" => {
                let update = config_update(name, args)?;
                ctx.configure(&update);
                Ok(ExecutionResult::empty())
            }
            "figure" => {
                if !args.is_empty() {
                    return Ok(ExecutionResult::error("TypeError: figure() takes no arguments"));
                }
                ctx.figures_mut().figure();
                Ok(ExecutionResult::empty())
            }
            "plot" => {
                let series = match plot_series(args) {
                    Ok(series) => series,
                    Err(message) => return Ok(ExecutionResult::error(message)),
                };
                ctx.figures_mut().plot(series);
                if ctx.config().interactive {
                    show(ctx, &ConfigUpdate::default())?;
                }
                Ok(ExecutionResult::empty())
            }
            "show" => {
                let overrides = config_update(name, args)?;
                show(ctx, &overrides)?;
                Ok(ExecutionResult::empty())
            }
            "close" => close(args, ctx),
            "print" => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Arg::Positional(src) => match printable(src) {
                            Some(text) => parts.push(text),
                            None => {
                                return Ok(ExecutionResult::error(format!(
                                    "TypeError: cannot print '{src}'"
                                )));
                            }
                        },
                        Arg::Keyword(key, _) => {
                            return Ok(ExecutionResult::error(format!(
                                "TypeError: print() got an unexpected keyword argument '{key}'"
                            )));
                        }
                    }
                }
                let mut line = parts.join(" ");
                line.push('\n');
                ctx.sink_mut().write_text(&line);
                Ok(ExecutionResult::empty())
            }
            other => Ok(ExecutionResult::error(format!(
                "NameError: name '{other}' is not defined"
            ))),
        }
    }
}

impl Interpreter for ScriptInterpreter {
    fn interpret(
        &mut self,
        statement: &str,
        ctx: &mut ExecutionContext,
    ) -> Result<ExecutionResult> {
        let result = match parse_statement(statement) {
            Ok(Statement::Nop) => ExecutionResult::empty(),
            Ok(Statement::Literal(value)) => ExecutionResult::text(value),
            Ok(Statement::Call { name, args }) => self.call(&name, &args, ctx)?,
            Err(err) => ExecutionResult::error(err.to_string()),
        };
        if !result.is_success() {
            tracing::warn!("Script error in {}: {}", ctx.id(), result.message);
        }
        Ok(result)
    }
}

/// Keyword arguments as a configuration change.
fn config_update(name: &str, args: &[Arg]) -> Result<ConfigUpdate> {
    let mut update = ConfigUpdate::default();
    for arg in args {
        match arg {
            Arg::Keyword(key, value) => update.set(key, value)?,
            Arg::Positional(value) => {
                return Err(Error::Config(format!(
                    "{name}() takes keyword options only, got '{value}'"
                )));
            }
        }
    }
    Ok(update)
}

fn plot_series(args: &[Arg]) -> std::result::Result<Series, String> {
    let mut lists = Vec::with_capacity(2);
    for arg in args {
        match arg {
            Arg::Positional(src) => lists.push(
                parse_number_list(src)
                    .ok_or_else(|| format!("TypeError: expected a list of numbers, got '{src}'"))?,
            ),
            Arg::Keyword(key, _) => {
                return Err(format!(
                    "TypeError: plot() got an unexpected keyword argument '{key}'"
                ));
            }
        }
    }

    let mut lists = lists.into_iter();
    match (lists.next(), lists.next(), lists.next()) {
        (Some(ys), None, None) => Ok(Series::from_values(ys)),
        (Some(xs), Some(ys), None) if xs.len() == ys.len() => Ok(Series::new(xs, ys)),
        (Some(xs), Some(ys), None) => Err(format!(
            "ValueError: x and y must have same first dimension, but have shapes ({},) and ({},)",
            xs.len(),
            ys.len()
        )),
        (None, _, _) => Err("TypeError: plot() missing data".to_string()),
        _ => Err("TypeError: plot() takes at most 2 data arguments".to_string()),
    }
}

fn close(args: &[Arg], ctx: &mut ExecutionContext) -> Result<ExecutionResult> {
    let figures = ctx.figures_mut();
    match args {
        [] => {
            figures.close_current();
        }
        [Arg::Positional(src)] => {
            if parse_string(src).as_deref() == Some("all") {
                figures.close_all();
            } else if let Ok(number) = src.parse::<u32>() {
                figures.close(FigureId::new(number));
            } else {
                return Ok(ExecutionResult::error(format!(
                    "TypeError: close() expects 'all' or a figure number, got '{src}'"
                )));
            }
        }
        _ => {
            return Ok(ExecutionResult::error(
                "TypeError: close() takes at most 1 argument",
            ));
        }
    }
    Ok(ExecutionResult::empty())
}

/// Text for a printable literal argument.
fn printable(src: &str) -> Option<String> {
    parse_string(src).or_else(|| src.parse::<f64>().ok().map(|_| src.to_string()))
}
