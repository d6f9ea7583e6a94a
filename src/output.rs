use crate::error::ErrorPayload;
use crate::region::Region;
use crate::rename::RenameReport;
use crate::rows::Row;
use crate::session::Status;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const CLERK_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ClerkOutput {
    Name(NameOutput),
    Models(ModelsOutput),
    Ocr(OcrOutput),
    Rename(RenameOutput),
    Session(SessionOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameOutput {
    pub version: String,
    pub template: String,
    pub fragments: Vec<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsOutput {
    pub version: String,
    pub models_dir: PathBuf,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOutput {
    pub version: String,
    pub input: PathBuf,
    pub page: usize,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutput {
    pub version: String,
    pub template: String,
    pub dry_run: bool,
    pub rows: Vec<Row>,
    pub report: RenameReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput {
    pub version: String,
    pub model: String,
    pub template: String,
    pub statuses: Vec<Status>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RenameReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::rename::{RenameOutcome, RenameStatus};

    #[test]
    fn name_output_serializes() {
        let output = ClerkOutput::Name(NameOutput {
            version: CLERK_OUTPUT_VERSION.to_string(),
            template: "file_$0$_$1$.jpg".to_string(),
            fragments: vec!["image".into(), "01".into()],
            name: "file_image_01.jpg".to_string(),
            unresolved: vec![],
        });

        let json = serde_json::to_string(&output).expect("serialize name output");
        assert!(json.contains("\"mode\":\"name\""));
        assert!(json.contains("\"name\":\"file_image_01.jpg\""));
        assert!(!json.contains("unresolved"));
    }

    #[test]
    fn rename_output_serializes() {
        let output = ClerkOutput::Rename(RenameOutput {
            version: CLERK_OUTPUT_VERSION.to_string(),
            template: "$0$.jpg".to_string(),
            dry_run: true,
            rows: vec![],
            report: RenameReport {
                outcomes: vec![RenameOutcome {
                    row: 0,
                    source: PathBuf::from("/a/b/old.jpg"),
                    destination: Some(PathBuf::from("/a/b/new.jpg")),
                    status: RenameStatus::Planned,
                }],
            },
        });

        let json = serde_json::to_string(&output).expect("serialize rename output");
        assert!(json.contains("\"mode\":\"rename\""));
        assert!(json.contains("\"dryRun\":true"));
        assert!(json.contains("\"status\":\"planned\""));
    }

    #[test]
    fn error_output_round_trips() {
        let output = ClerkOutput::Error(ErrorOutput {
            version: CLERK_OUTPUT_VERSION.to_string(),
            message: Some("boom".to_string()),
            error: ErrorPayload::new(ErrorCategory::Io, "boom".to_string(), "retry"),
        });

        let json = serde_json::to_string(&output).expect("serialize error output");
        let parsed: ClerkOutput = serde_json::from_str(&json).expect("parse error output");
        assert!(matches!(parsed, ClerkOutput::Error(e) if e.error.category == ErrorCategory::Io));
    }
}
