//! Shared JSON event types for consistent CLI output.

use std::path::Path;

use serde::Serialize;

/// Event emitted when a command starts.
#[derive(Debug, Clone, Serialize)]
pub struct StartEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub version: &'static str,
}

impl<'a> StartEvent<'a> {
    pub fn new(command: &'a str) -> Self {
        Self {
            event: "start",
            command,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Event emitted when a command finishes.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub success: bool,
}

impl<'a> CompleteEvent<'a> {
    pub fn success(command: &'a str) -> Self {
        Self {
            event: "complete",
            command,
            success: true,
        }
    }

    pub fn failure(command: &'a str) -> Self {
        Self {
            event: "complete",
            command,
            success: false,
        }
    }
}

/// Event emitted once per output document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEvent<'a> {
    pub event: &'static str,
    pub document: &'a str,
    /// `written`, `skipped` or `failed`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> DocumentEvent<'a> {
    pub fn written(document: &'a str, path: &Path) -> Self {
        Self {
            event: "document",
            document,
            status: "written",
            path: Some(path.display().to_string()),
            error: None,
        }
    }

    pub fn skipped(document: &'a str) -> Self {
        Self {
            event: "document",
            document,
            status: "skipped",
            path: None,
            error: None,
        }
    }

    pub fn failed(document: &'a str, error: impl ToString) -> Self {
        Self {
            event: "document",
            document,
            status: "failed",
            path: None,
            error: Some(error.to_string()),
        }
    }
}

/// Event emitted for a non-fatal warning (e.g. unknown config key).
#[derive(Debug, Clone, Serialize)]
pub struct WarningEvent {
    pub event: &'static str,
    pub message: String,
}

impl WarningEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            event: "warning",
            message: message.into(),
        }
    }
}
