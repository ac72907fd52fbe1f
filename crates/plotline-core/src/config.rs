//! Sticky per-context plotting configuration.
//!
//! A context starts from [`ShowConfig::default`]. Each `configure(...)`
//! statement produces a [`ConfigUpdate`] which only touches the options it
//! names; everything else keeps its previous value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default rendered figure width in pixels.
pub const DEFAULT_WIDTH: u32 = 600;

/// Default rendered figure height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// How `show` behaves in one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Show automatically after every `plot`.
    pub interactive: bool,
    /// Close every shown figure at the end of `show`.
    pub close: bool,
    /// Publish rendered figures to the live registry and emit ANGULAR output.
    pub angular: bool,
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            interactive: false,
            close: true,
            angular: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ShowConfig {
    /// Apply an update in place.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(v) = update.interactive {
            self.interactive = v;
        }
        if let Some(v) = update.close {
            self.close = v;
        }
        if let Some(v) = update.angular {
            self.angular = v;
        }
        if let Some(v) = update.width {
            self.width = v;
        }
        if let Some(v) = update.height {
            self.height = v;
        }
    }

    /// A copy with `update` applied, leaving `self` untouched.
    pub fn with(&self, update: &ConfigUpdate) -> Self {
        let mut config = *self;
        config.apply(update);
        config
    }
}

/// A partial configuration change. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub interactive: Option<bool>,
    pub close: Option<bool>,
    pub angular: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ConfigUpdate {
    /// True when the update names no option.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set one option from its textual `key=value` form.
    ///
    /// Unknown keys and malformed values are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "interactive" => self.interactive = Some(parse_bool(key, value)?),
            "close" => self.close = Some(parse_bool(key, value)?),
            "angular" => self.angular = Some(parse_bool(key, value)?),
            "width" => self.width = Some(parse_size(key, value)?),
            "height" => self.height = Some(parse_size(key, value)?),
            other => {
                return Err(Error::Config(format!("unknown option '{other}'")));
            }
        }
        Ok(())
    }

    /// Build an update from a list of `(key, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut update = Self::default();
        for (key, value) in pairs {
            update.set(key, value)?;
        }
        Ok(update)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}

fn parse_size(key: &str, value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!(
            "{key}: expected a positive integer, got '{}'",
            value.trim()
        ))),
    }
}
