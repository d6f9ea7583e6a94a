use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rows::{Row, RowStore};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read table {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write table {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON table (expected {{template?, rows: [{{source, fragments}}]}}): {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML table (expected {{template?, rows: [{{source, fragments}}]}}): {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Row table as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub source: PathBuf,
    #[serde(default)]
    pub fragments: Vec<String>,
}

impl TableFile {
    /// Parse by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let raw = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if is_yaml(path) {
            Ok(serde_yaml::from_str(&raw)?)
        } else {
            Ok(serde_json::from_str(&raw)?)
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, content).map_err(|source| TableError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn to_store(&self) -> RowStore {
        RowStore::from_rows(
            self.rows
                .iter()
                .map(|r| Row::with_fragments(r.source.clone(), r.fragments.clone()))
                .collect(),
        )
    }

    pub fn from_store(store: &RowStore, template: Option<String>) -> Self {
        Self {
            template,
            rows: store
                .rows()
                .iter()
                .map(|r| TableRow {
                    source: r.source_path.clone(),
                    fragments: r.fragments.clone(),
                })
                .collect(),
        }
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_json_table() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("rows.json");
        fs::write(
            &path,
            r#"{"template":"$0$.jpg","rows":[{"source":"/s/a.jpg","fragments":["x","y"]},{"source":"/s/b.jpg"}]}"#,
        )
        .expect("write");

        let table = TableFile::load(&path).expect("load");
        assert_eq!(table.template.as_deref(), Some("$0$.jpg"));
        let store = table.to_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.columns(), 2);
        assert_eq!(store.get(1).unwrap().fragments, vec!["", ""]);
    }

    #[test]
    fn loads_yaml_table() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("rows.yaml");
        fs::write(
            &path,
            "rows:\n  - source: /s/a.jpg\n    fragments: [invoice, \"7\"]\n",
        )
        .expect("write");

        let table = TableFile::load(&path).expect("load");
        assert!(table.template.is_none());
        assert_eq!(table.rows[0].fragments, vec!["invoice", "7"]);
    }

    #[test]
    fn malformed_json_reports_expected_shape() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("rows.json");
        fs::write(&path, "[1, 2]").expect("write");
        let err = TableFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn store_survives_save_and_load() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("out.json");
        let mut store = RowStore::new();
        store.push(Row::with_fragments("/s/a.jpg", vec!["one".into()]));

        TableFile::from_store(&store, Some("$0$".into()))
            .save(&path)
            .expect("save");
        let loaded = TableFile::load(&path).expect("load");
        assert_eq!(loaded.to_store(), store);
        assert_eq!(loaded.template.as_deref(), Some("$0$"));
    }
}
