use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::ocr::OcrError;
use crate::session::{ScriptError, SessionError};
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum ClerkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("No OCR models found in {0}")]
    NoModels(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for ClerkError {
    fn from(err: ConfigError) -> Self {
        ClerkError::Config(err.to_string())
    }
}

impl From<SessionError> for ClerkError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoModels(dir) => ClerkError::NoModels(dir),
        }
    }
}

impl ClerkError {
    pub fn config(message: impl Into<String>) -> Self {
        ClerkError::Config(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            ClerkError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            ClerkError::Document(e) => {
                let remediation = match e {
                    DocumentError::Rasterize(_) => {
                        "Install poppler-utils (pdftoppm) or set pdf.pdftoppm in clerk.toml."
                    }
                    DocumentError::UnsupportedExtension { .. } => {
                        "Use a supported input type (png, jpg, jpeg, pdf)."
                    }
                    DocumentError::NotFound(_) => {
                        "Verify the file exists; use an absolute path or run from its directory."
                    }
                    _ => "Verify the file is a readable image or PDF.",
                };
                ErrorPayload::new(ErrorCategory::Image, e.to_string(), remediation)
            }
            ClerkError::Table(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Provide a table like {\"template\": \"$0$.jpg\", \"rows\": [{\"source\": \"a.jpg\", \"fragments\": [\"x\"]}]}.",
            ),
            ClerkError::Script(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Provide a list of actions like [{\"action\": \"open-image\", \"path\": \"scan.jpg\"}, {\"action\": \"process\"}].",
            ),
            ClerkError::Ocr(e) => ErrorPayload::new(
                ErrorCategory::Ocr,
                e.to_string(),
                "Set models_dir in clerk.toml (or --models-dir) to your tessdata directory.",
            ),
            ClerkError::NoModels(dir) => ErrorPayload::new(
                ErrorCategory::Ocr,
                format!("No OCR models found in {dir}"),
                "Install Tesseract language data (*.traineddata) or point models_dir at it.",
            ),
            ClerkError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("zoom") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Keep 0 < zoom.min <= zoom.default <= zoom.max and a non-zero zoom.wheel_delta.",
                    )
                } else if lower.contains("failed to parse") || lower.contains("unknown field") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check clerk.toml syntax and key names (models_dir, model_extension, default_model, template, [selection], [zoom], [pdf]).",
                    )
                } else if lower.contains("region") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Pass --region as X,Y,WIDTHxHEIGHT in image pixels (e.g., 10,20,300x40).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClerkError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Io,
    Image,
    Ocr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
