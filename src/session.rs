//! Application state driven by explicit commands.
//!
//! A UI adapter translates user input into [`Action`]s and feeds them to
//! [`Session::dispatch`]. Every action returns a [`Status`]: either
//! `Ignored` for silent aborts (no file chosen, selection too small) or a
//! transient message for the status bar. Only construction can fail.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::Document;
use crate::ocr::OcrEngine;
use crate::pattern::unresolved;
use crate::rename::{rename_all, RenameOptions, RenameReport, RenameStatus};
use crate::rows::{Row, RowStore};
use crate::selection::{ViewRect, Zoom};
use crate::table::{is_yaml, TableFile};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No OCR models found in {0}")]
    NoModels(String),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON script (expected a list of {{\"action\": ...}} objects): {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML script (expected a list of {{action: ...}} mappings): {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load a list of actions; `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn load_script(path: &Path) -> Result<Vec<Action>, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if is_yaml(path) {
        Ok(serde_yaml::from_str(&raw)?)
    } else {
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    OpenImage {
        path: PathBuf,
    },
    OpenPdf {
        path: PathBuf,
    },
    NextPage,
    Zoom {
        delta: f64,
    },
    /// Rubber-band drag in view coordinates.
    Select {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    SelectCell {
        row: usize,
        column: usize,
    },
    SetFragment {
        row: usize,
        column: usize,
        text: String,
    },
    AddColumn,
    InsertRow {
        at: usize,
        #[serde(default)]
        path: Option<PathBuf>,
    },
    DeleteRow {
        row: usize,
    },
    SetTemplate {
        template: String,
    },
    SetModel {
        model: String,
    },
    Process,
    Rename {
        #[serde(default)]
        dry_run: bool,
        #[serde(default)]
        stop_on_error: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Status {
    Ignored,
    Info(String),
    Warning(String),
}

impl Status {
    pub fn message(&self) -> Option<&str> {
        match self {
            Status::Ignored => None,
            Status::Info(msg) | Status::Warning(msg) => Some(msg.as_str()),
        }
    }
}

pub struct Session {
    config: Config,
    models: Vec<String>,
    model: String,
    engine: Box<dyn OcrEngine>,
    rows: RowStore,
    template: String,
    document: Option<Document>,
    zoom: Zoom,
    selected_cell: Option<(usize, usize)>,
    last_report: Option<RenameReport>,
    status: Status,
}

impl Session {
    pub fn new(
        config: Config,
        models: BTreeSet<String>,
        engine: Box<dyn OcrEngine>,
    ) -> Result<Self, SessionError> {
        let models: Vec<String> = models.into_iter().collect();
        let model = config
            .default_model
            .as_ref()
            .filter(|m| models.contains(m))
            .or_else(|| models.first())
            .cloned()
            .ok_or_else(|| SessionError::NoModels(config.models_dir.display().to_string()))?;
        info!(model = %model, available = models.len(), "session started");

        Ok(Self {
            template: config.template.clone(),
            zoom: Zoom::new(config.zoom),
            config,
            models,
            model,
            engine,
            rows: RowStore::new(),
            document: None,
            selected_cell: None,
            last_report: None,
            status: Status::Ignored,
        })
    }

    /// Replace the row table, and the template when the table carries one.
    pub fn load_table(&mut self, table: &TableFile) {
        self.rows = table.to_store();
        if let Some(template) = &table.template {
            self.template = template.clone();
        }
        self.selected_cell = None;
    }

    pub fn to_table(&self) -> TableFile {
        TableFile::from_store(&self.rows, Some(self.template.clone()))
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn selected_cell(&self) -> Option<(usize, usize)> {
        self.selected_cell
    }

    pub fn last_report(&self) -> Option<&RenameReport> {
        self.last_report.as_ref()
    }

    /// Last non-ignored status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn dispatch(&mut self, action: Action) -> Status {
        debug!(?action, "dispatch");
        let status = match action {
            Action::OpenImage { path } => self.open(path, false),
            Action::OpenPdf { path } => self.open(path, true),
            Action::NextPage => self.next_page(),
            Action::Zoom { delta } => self.zoom_by(delta),
            Action::Select { x0, y0, x1, y1 } => self.select(ViewRect::from_drag((x0, y0), (x1, y1))),
            Action::SelectCell { row, column } => self.select_cell(row, column),
            Action::SetFragment { row, column, text } => self.set_fragment(row, column, text),
            Action::AddColumn => self.add_column(),
            Action::InsertRow { at, path } => self.insert_row(at, path),
            Action::DeleteRow { row } => self.delete_row(row),
            Action::SetTemplate { template } => self.set_template(template),
            Action::SetModel { model } => self.set_model(model),
            Action::Process => self.process(),
            Action::Rename {
                dry_run,
                stop_on_error,
            } => self.rename(RenameOptions {
                stop_on_error,
                dry_run,
            }),
        };
        if status != Status::Ignored {
            self.status = status.clone();
        }
        status
    }

    fn open(&mut self, path: PathBuf, pdf: bool) -> Status {
        if path.as_os_str().is_empty() {
            debug!("no file selected");
            return Status::Ignored;
        }
        let opened = if pdf {
            Document::open_pdf(&path, &self.config.pdf)
        } else {
            Document::open_image(&path)
        };
        let document = match opened {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %path.display(), "failed to open: {e}");
                return Status::Warning(format!("Could not open {}: {e}", path.display()));
            }
        };

        self.document = Some(document);
        self.zoom.reset();
        let row = self.rows.push(Row::new(path.clone()));
        info!(path = %path.display(), row, "opened file");
        Status::Info(format!("Opened file: {}", path.display()))
    }

    fn next_page(&mut self) -> Status {
        let Some(doc) = self.document.as_mut() else {
            return Status::Ignored;
        };
        let page = doc.next_page();
        let count = doc.page_count();
        self.zoom.reset();
        Status::Info(format!("Page {} of {}", page + 1, count))
    }

    fn zoom_by(&mut self, delta: f64) -> Status {
        if self.document.is_none() {
            return Status::Ignored;
        }
        let scale = self.zoom.apply_wheel(delta);
        Status::Info(format!("Photo scale set to: {scale}"))
    }

    fn select(&mut self, rect: ViewRect) -> Status {
        let Some(doc) = self.document.as_ref() else {
            return Status::Ignored;
        };
        let Some(crop) = rect.to_crop(self.zoom.scale(), &self.config.selection) else {
            debug!(?rect, "selection too small");
            return Status::Ignored;
        };
        let Some(region) = doc.crop(crop) else {
            debug!(?crop, "selection outside the page");
            return Status::Ignored;
        };

        let text = self.engine.recognize_text(&self.model, &region);
        info!(?crop, text = %text, "recognized selection");

        let Some((row, column)) = self.selected_cell else {
            return Status::Warning("You must select a valid cell!".to_string());
        };
        match self.rows.set_fragment(row, column, text.clone()) {
            Ok(()) => Status::Info(format!("Text selected: {text}")),
            Err(e) => Status::Warning(e.to_string()),
        }
    }

    fn select_cell(&mut self, row: usize, column: usize) -> Status {
        if row >= self.rows.len() || column >= self.rows.columns() {
            self.selected_cell = None;
            return Status::Warning("You must select a valid cell!".to_string());
        }
        self.selected_cell = Some((row, column));
        Status::Ignored
    }

    fn set_fragment(&mut self, row: usize, column: usize, text: String) -> Status {
        match self.rows.set_fragment(row, column, text) {
            Ok(()) => Status::Ignored,
            Err(e) => Status::Warning(e.to_string()),
        }
    }

    fn add_column(&mut self) -> Status {
        let column = self.rows.add_column();
        Status::Info(format!("Added column {column}"))
    }

    fn insert_row(&mut self, at: usize, path: Option<PathBuf>) -> Status {
        let row = self.rows.insert(at, Row::new(path.unwrap_or_default()));
        if let Some((selected, column)) = self.selected_cell {
            if selected >= row {
                self.selected_cell = Some((selected + 1, column));
            }
        }
        Status::Info(format!("Added new row {row}"))
    }

    fn delete_row(&mut self, row: usize) -> Status {
        if let Err(e) = self.rows.remove(row) {
            return Status::Warning(e.to_string());
        }
        self.selected_cell = match self.selected_cell {
            Some((selected, _)) if selected == row => None,
            Some((selected, column)) if selected > row => Some((selected - 1, column)),
            other => other,
        };
        Status::Info(format!("Removed row {row}"))
    }

    fn set_template(&mut self, template: String) -> Status {
        self.template = template;
        Status::Ignored
    }

    fn set_model(&mut self, model: String) -> Status {
        if !self.models.contains(&model) {
            return Status::Warning(format!("Unknown model: {model}"));
        }
        info!(model = %model, "model selected");
        self.model = model;
        Status::Info(format!("Model selected as: {}", self.model))
    }

    fn process(&mut self) -> Status {
        self.rows.generate_names(&self.template);
        let missing = unresolved(&self.template, self.rows.columns());
        if !missing.is_empty() {
            warn!(?missing, "template refers to columns that do not exist");
            return Status::Warning(format!(
                "Generated {} names; placeholders without a column: {}",
                self.rows.len(),
                missing
                    .iter()
                    .map(|i| format!("${i}$"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Status::Info(format!("Generated {} names", self.rows.len()))
    }

    fn rename(&mut self, options: RenameOptions) -> Status {
        let report = rename_all(self.rows.rows(), options);
        for outcome in report.renamed() {
            if let Some(destination) = &outcome.destination {
                if let Err(e) = self.rows.set_source(outcome.row, destination) {
                    warn!(row = outcome.row, "renamed file has no row: {e}");
                }
            }
        }

        let renamed = report.count(|s| matches!(s, RenameStatus::Renamed | RenameStatus::Planned));
        let failed = report.failures().count();
        let verb = if options.dry_run { "Would rename" } else { "Renamed" };
        let status = if failed > 0 {
            Status::Warning(format!("{verb} {renamed} files; {failed} failed"))
        } else {
            Status::Info(format!("{verb} {renamed} files"))
        };
        self.last_report = Some(report);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct FixedText {
        text: String,
        calls: Rc<RefCell<Vec<(String, u32, u32)>>>,
    }

    impl OcrEngine for FixedText {
        fn recognize_text(&self, model: &str, image: &image::DynamicImage) -> String {
            self.calls
                .borrow_mut()
                .push((model.to_string(), image.width(), image.height()));
            self.text.clone()
        }
    }

    fn models(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn session_with(text: &str) -> (Session, Rc<RefCell<Vec<(String, u32, u32)>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let engine = FixedText {
            text: text.to_string(),
            calls: Rc::clone(&calls),
        };
        let session = Session::new(Config::default(), models(&["deu", "eng"]), Box::new(engine))
            .expect("session");
        (session, calls)
    }

    fn write_scan(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(200, 100, image::Rgb([255, 255, 255]))
            .save(&path)
            .expect("write scan");
        path
    }

    #[test]
    fn construction_requires_models() {
        let err = Session::new(
            Config::default(),
            BTreeSet::new(),
            Box::new(crate::ocr::TesseractCommand::default()),
        )
        .err()
        .expect("no models must fail");
        assert!(matches!(err, SessionError::NoModels(_)));
    }

    #[test]
    fn configured_default_model_wins_when_available() {
        let config = Config {
            default_model: Some("eng".to_string()),
            ..Config::default()
        };
        let session = Session::new(
            config,
            models(&["deu", "eng"]),
            Box::new(crate::ocr::TesseractCommand::default()),
        )
        .expect("session");
        assert_eq!(session.model(), "eng");

        let (session, _) = session_with("");
        assert_eq!(session.model(), "deu");
    }

    #[test]
    fn opening_a_file_appends_a_row() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, _) = session_with("");

        let status = session.dispatch(Action::OpenImage { path: scan.clone() });
        assert!(matches!(status, Status::Info(_)));
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.rows().get(0).unwrap().source_path, scan);
        assert!(session.document().is_some());
    }

    #[test]
    fn empty_path_is_a_silent_abort() {
        let (mut session, _) = session_with("");
        assert_eq!(
            session.dispatch(Action::OpenImage {
                path: PathBuf::new()
            }),
            Status::Ignored
        );
        assert!(session.rows().is_empty());
    }

    #[test]
    fn unreadable_image_keeps_prior_state() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"garbage").expect("write");
        let (mut session, _) = session_with("");

        session.dispatch(Action::OpenImage { path: scan.clone() });
        let status = session.dispatch(Action::OpenImage { path: broken });

        assert!(matches!(status, Status::Warning(_)));
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.document().map(|d| d.source()), Some(scan.as_path()));
    }

    #[test]
    fn selection_fills_selected_cell_with_recognized_text() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, calls) = session_with("INV-42");

        session.dispatch(Action::OpenImage { path: scan });
        session.dispatch(Action::AddColumn);
        session.dispatch(Action::SelectCell { row: 0, column: 0 });
        let status = session.dispatch(Action::Select {
            x0: 60.0,
            y0: 50.0,
            x1: 10.0,
            y1: 20.0,
        });

        assert_eq!(status, Status::Info("Text selected: INV-42".to_string()));
        assert_eq!(session.rows().get(0).unwrap().fragments, vec!["INV-42"]);
        assert_eq!(calls.borrow().as_slice(), &[("deu".to_string(), 50, 30)]);
    }

    #[test]
    fn selection_uses_zoom_scale() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, calls) = session_with("x");

        session.dispatch(Action::OpenImage { path: scan });
        session.dispatch(Action::Zoom { delta: 2880.0 });
        session.dispatch(Action::Select {
            x0: 0.0,
            y0: 0.0,
            x1: 100.0,
            y1: 40.0,
        });

        assert_eq!(calls.borrow()[0].1, 50);
        assert_eq!(calls.borrow()[0].2, 20);
    }

    #[test]
    fn small_selection_is_ignored_without_ocr() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, calls) = session_with("x");

        session.dispatch(Action::OpenImage { path: scan });
        let status = session.dispatch(Action::Select {
            x0: 0.0,
            y0: 0.0,
            x1: 5.0,
            y1: 50.0,
        });
        assert_eq!(status, Status::Ignored);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn selection_without_cell_reports_message() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, _) = session_with("x");

        session.dispatch(Action::OpenImage { path: scan });
        let status = session.dispatch(Action::Select {
            x0: 0.0,
            y0: 0.0,
            x1: 50.0,
            y1: 50.0,
        });
        assert!(matches!(status, Status::Warning(_)));
    }

    #[test]
    fn insert_and_delete_keep_selection_on_same_row() {
        let (mut session, _) = session_with("");
        session.dispatch(Action::InsertRow { at: 0, path: Some("a.jpg".into()) });
        session.dispatch(Action::InsertRow { at: 1, path: Some("b.jpg".into()) });
        session.dispatch(Action::AddColumn);
        session.dispatch(Action::SelectCell { row: 1, column: 0 });

        session.dispatch(Action::InsertRow { at: 0, path: None });
        assert_eq!(session.selected_cell(), Some((2, 0)));

        session.dispatch(Action::DeleteRow { row: 0 });
        assert_eq!(session.selected_cell(), Some((1, 0)));

        session.dispatch(Action::DeleteRow { row: 1 });
        assert_eq!(session.selected_cell(), None);
        assert!(matches!(
            session.dispatch(Action::DeleteRow { row: 5 }),
            Status::Warning(_)
        ));
    }

    #[test]
    fn unknown_model_is_rejected() {
        let (mut session, _) = session_with("");
        assert!(matches!(
            session.dispatch(Action::SetModel { model: "fra".into() }),
            Status::Warning(_)
        ));
        session.dispatch(Action::SetModel { model: "eng".into() });
        assert_eq!(session.model(), "eng");
    }

    #[test]
    fn process_then_rename_updates_sources() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, _) = session_with("");

        session.dispatch(Action::OpenImage { path: scan.clone() });
        session.dispatch(Action::AddColumn);
        session.dispatch(Action::SetFragment {
            row: 0,
            column: 0,
            text: "invoice".into(),
        });
        session.dispatch(Action::SetTemplate {
            template: "$0$_$1$.png".into(),
        });
        assert!(matches!(session.dispatch(Action::Process), Status::Warning(_)));

        session.dispatch(Action::SetTemplate {
            template: "$0$.png".into(),
        });
        assert_eq!(
            session.dispatch(Action::Process),
            Status::Info("Generated 1 names".to_string())
        );
        let status = session.dispatch(Action::Rename {
            dry_run: false,
            stop_on_error: false,
        });

        let renamed = dir.path().join("invoice.png");
        assert_eq!(status, Status::Info("Renamed 1 files".to_string()));
        assert!(renamed.exists());
        assert!(!scan.exists());
        assert_eq!(session.rows().get(0).unwrap().source_path, renamed);
        assert!(session.last_report().is_some());
    }

    #[test]
    fn recognized_path_text_does_not_move_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let scan = write_scan(&dir, "scan.png");
        let (mut session, _) = session_with("");

        session.dispatch(Action::OpenImage { path: scan.clone() });
        session.dispatch(Action::AddColumn);
        session.dispatch(Action::SetFragment {
            row: 0,
            column: 0,
            text: "../outside".into(),
        });
        session.dispatch(Action::SetTemplate {
            template: "$0$.png".into(),
        });
        session.dispatch(Action::Process);
        let status = session.dispatch(Action::Rename {
            dry_run: false,
            stop_on_error: false,
        });

        assert!(matches!(status, Status::Warning(_)));
        assert!(scan.exists());
        assert_eq!(session.rows().get(0).unwrap().source_path, scan);
    }

    #[test]
    fn loads_yaml_script() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("script.yaml");
        fs::write(
            &path,
            "- action: add-column\n- action: set-template\n  template: \"$0$.jpg\"\n- action: process\n",
        )
        .expect("write script");

        let actions = load_script(&path).expect("load script");
        assert_eq!(
            actions,
            vec![
                Action::AddColumn,
                Action::SetTemplate {
                    template: "$0$.jpg".into()
                },
                Action::Process,
            ]
        );
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: Action =
            serde_json::from_str(r#"{"action":"insert-row","at":2}"#).expect("parse");
        assert_eq!(action, Action::InsertRow { at: 2, path: None });
        let action: Action = serde_json::from_str(r#"{"action":"rename"}"#).expect("parse");
        assert_eq!(
            action,
            Action::Rename {
                dry_run: false,
                stop_on_error: false
            }
        );
    }
}
