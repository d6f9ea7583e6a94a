//! Batch renaming of rows to their generated names.
//!
//! Each row is renamed within its own directory; only the final path
//! component changes. Rows are processed in table order and every rename is
//! attempted independently unless [`RenameOptions::stop_on_error`] is set.
//! Nothing is rolled back.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::rows::Row;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Abort the remaining rows after the first failure.
    pub stop_on_error: bool,
    /// Report destinations without touching the file system.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RenameStatus {
    Renamed,
    /// Dry run: the rename would have been attempted.
    Planned,
    /// Destination equals source.
    Unchanged,
    Skipped { reason: String },
    Failed { error: String },
    /// Not attempted because an earlier row failed with `stop_on_error`.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub row: usize,
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(flatten)]
    pub status: RenameStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameReport {
    pub fn failures(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RenameStatus::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn renamed(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == RenameStatus::Renamed)
    }

    pub fn count(&self, pred: impl Fn(&RenameStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Destination for a row: the source's directory joined with the new name.
/// The name is not checked here; [`rename_all`] refuses names that are not a
/// single file name.
pub fn destination_path(source: &Path, generated_name: &str) -> PathBuf {
    match source.parent() {
        Some(dir) => dir.join(generated_name),
        None => PathBuf::from(generated_name),
    }
}

/// Rename every row to its generated name, in order.
pub fn rename_all(rows: &[Row], options: RenameOptions) -> RenameReport {
    let mut report = RenameReport::default();
    let mut aborted = false;

    for (index, row) in rows.iter().enumerate() {
        if aborted {
            report.outcomes.push(RenameOutcome {
                row: index,
                source: row.source_path.clone(),
                destination: None,
                status: RenameStatus::NotAttempted,
            });
            continue;
        }

        let outcome = rename_row(index, row, options);
        if let RenameStatus::Failed { error } = &outcome.status {
            warn!(row = index, source = %row.source_path.display(), "rename failed: {error}");
            if options.stop_on_error {
                aborted = true;
            }
        }
        report.outcomes.push(outcome);
    }

    info!(
        renamed = report.count(|s| *s == RenameStatus::Renamed),
        failed = report.failures().count(),
        "batch rename finished"
    );
    report
}

fn rename_row(index: usize, row: &Row, options: RenameOptions) -> RenameOutcome {
    let skipped = |reason: &str| RenameOutcome {
        row: index,
        source: row.source_path.clone(),
        destination: None,
        status: RenameStatus::Skipped {
            reason: reason.to_string(),
        },
    };

    if !row.has_source() {
        return skipped("row has no source file");
    }
    let name = match row.generated_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        Some(_) => return skipped("generated name is empty"),
        None => return skipped("no generated name; process the table first"),
    };
    if !is_single_file_name(name) {
        return RenameOutcome {
            row: index,
            source: row.source_path.clone(),
            destination: None,
            status: RenameStatus::Failed {
                error: format!("generated name must be a single file name, got {name:?}"),
            },
        };
    }

    let destination = destination_path(&row.source_path, name);
    let status = if destination == row.source_path {
        RenameStatus::Unchanged
    } else {
        match check_and_rename(&row.source_path, &destination, options.dry_run) {
            Ok(status) => status,
            Err(error) => RenameStatus::Failed { error },
        }
    };
    debug!(row = index, from = %row.source_path.display(), to = %destination.display(), ?status, "rename");

    RenameOutcome {
        row: index,
        source: row.source_path.clone(),
        destination: Some(destination),
        status,
    }
}

/// A name that stays inside the source directory: one normal component, no
/// root, no `..`, no separators.
fn is_single_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR)
}

/// The existence check and the rename are separate steps: a destination
/// created by another process in between is replaced on Unix, where
/// `fs::rename` overwrites silently.
fn check_and_rename(source: &Path, destination: &Path, dry_run: bool) -> Result<RenameStatus, String> {
    if !source.exists() {
        return Err(format!("source not found: {}", source.display()));
    }
    if destination.exists() {
        return Err(format!("destination already exists: {}", destination.display()));
    }
    if dry_run {
        return Ok(RenameStatus::Planned);
    }
    fs::rename(source, destination).map_err(|e| e.to_string())?;
    Ok(RenameStatus::Renamed)
}
