//! Typed execution results returned to the notebook layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How the caller should render a result message.
///
/// This enumeration is the wire contract with the notebook frontend and
/// serializes upper-case (`"TEXT"`, `"HTML"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentKind {
    /// Plain text.
    #[default]
    Text,
    /// Static HTML.
    Html,
    /// HTML template bound to live-registry objects.
    Angular,
    /// Inline image.
    Image,
    /// Tab-separated table.
    Table,
    /// Inline SVG document.
    Svg,
    /// No renderable output.
    Null,
}

impl ContentKind {
    /// Lower-case directive name (as used in `%html ...`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Html => "html",
            ContentKind::Angular => "angular",
            ContentKind::Image => "img",
            ContentKind::Table => "table",
            ContentKind::Svg => "svg",
            ContentKind::Null => "null",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ContentKind::Text),
            "html" => Ok(ContentKind::Html),
            "angular" => Ok(ContentKind::Angular),
            "img" | "image" => Ok(ContentKind::Image),
            "table" => Ok(ContentKind::Table),
            "svg" => Ok(ContentKind::Svg),
            "null" => Ok(ContentKind::Null),
            other => Err(Error::Config(format!("unknown content kind '{other}'"))),
        }
    }
}

/// Outcome of a statement as seen by the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Error,
}

/// The single typed result produced for every statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: Status,
    pub kind: ContentKind,
    pub message: String,
}

impl ExecutionResult {
    /// Create a result with explicit fields.
    pub fn new(status: Status, kind: ContentKind, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    /// A successful result carrying no direct message.
    pub fn empty() -> Self {
        Self::new(Status::Success, ContentKind::Text, String::new())
    }

    /// A successful plain-text result.
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(Status::Success, ContentKind::Text, message)
    }

    /// A script-level failure. Always plain text.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Status::Error, ContentKind::Text, message)
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
