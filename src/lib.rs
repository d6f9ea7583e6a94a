//! Clerk Library
//!
//! Builds new file names for scanned images and PDF pages from text found on
//! the page, then renames the files in place. Text is collected per file into
//! a row table (by OCR on a selected region or by hand) and substituted into
//! a template with positional `$i$` placeholders.
//!
//! # Module Overview
//!
//! - [`pattern`] - Template substitution (`$0$`, `$1$`, ...)
//! - [`rows`] - Ordered row table of source files and fragments
//! - [`rename`] - Batch renaming within each file's directory
//! - [`ocr`] - OCR model discovery and text recognition
//! - [`document`] - Image and PDF page loading
//! - [`selection`] - Selection geometry and zoom
//! - [`session`] - Command dispatch for UI adapters
//! - [`config`] - Configuration file support
//! - [`table`] - Row tables on disk (JSON/YAML)
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use clerk_lib::{rename_all, RenameOptions, Row, RowStore};
//!
//! let mut rows = RowStore::new();
//! rows.push(Row::with_fragments("/scans/0001.jpg", vec!["invoice".into(), "42".into()]));
//! rows.generate_names("$0$_$1$.jpg");
//!
//! let report = rename_all(rows.rows(), RenameOptions::default());
//! for failure in report.failures() {
//!     eprintln!("row {}: {:?}", failure.row, failure.status);
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod ocr;
pub mod output;
pub mod pattern;
pub mod region;
pub mod rename;
pub mod rows;
pub mod selection;
pub mod session;
pub mod table;

pub use config::Config;
pub use document::{Document, DocumentError, DocumentKind};
pub use error::{ClerkError, ErrorCategory, ErrorPayload, Result};
pub use ocr::{default_engine, list_models, OcrEngine, OcrError, TesseractCommand};
pub use output::{
    ClerkOutput, ErrorOutput, ModelsOutput, NameOutput, OcrOutput, RenameOutput, SessionOutput,
    CLERK_OUTPUT_VERSION,
};
pub use pattern::{generate_name, placeholders, unresolved};
pub use region::Region;
pub use rename::{
    destination_path, rename_all, RenameOptions, RenameOutcome, RenameReport, RenameStatus,
};
pub use rows::{Row, RowError, RowStore};
pub use selection::{CropRect, ViewRect, Zoom};
pub use session::{load_script, Action, ScriptError, Session, SessionError, Status};
pub use table::{TableError, TableFile, TableRow};
