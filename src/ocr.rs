//! OCR model discovery and text recognition.
//!
//! Recognition is a total operation: given a model name and an image region
//! it returns the recognized text, which is empty when nothing could be read
//! or the OCR backend failed. Failures are logged, never returned.
//!
//! Two backends are provided:
//!
//! - [`TesseractCommand`] shells out to the `tesseract` executable and is
//!   always available.
//! - `LeptessEngine` links Tesseract through the `leptess` crate and requires
//!   the `ocr` feature:
//!
//! ```toml
//! [dependencies]
//! clerk = { version = "0.1", features = ["ocr"] }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::{DynamicImage, ImageOutputFormat};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Models directory not found: {0}")]
    ModelsDirNotFound(String),
    #[error("Failed to read models directory {path}: {source}")]
    ModelsDirUnreadable {
        path: String,
        source: std::io::Error,
    },
}

/// Enumerate models in `dir`: stems of regular files ending in
/// `.{extension}`. Non-recursive, extension match is case-sensitive.
pub fn list_models(dir: &Path, extension: &str) -> Result<BTreeSet<String>, OcrError> {
    if !dir.is_dir() {
        return Err(OcrError::ModelsDirNotFound(dir.display().to_string()));
    }
    let extension = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir).map_err(|source| OcrError::ModelsDirUnreadable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut models = BTreeSet::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            models.insert(stem.to_string());
        }
    }
    debug!(dir = %dir.display(), count = models.len(), "discovered OCR models");
    Ok(models)
}

/// Text recognition collaborator.
pub trait OcrEngine {
    /// Recognize text in `image` using `model`. Never fails; returns an empty
    /// string when nothing was recognized.
    fn recognize_text(&self, model: &str, image: &DynamicImage) -> String;
}

/// Grayscale conversion applied before recognition.
pub fn prepare_image(image: &DynamicImage) -> DynamicImage {
    image.grayscale()
}

fn encode_png(image: &DynamicImage) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    match image.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png) {
        Ok(()) => Some(buf),
        Err(e) => {
            warn!("failed to encode OCR input: {e}");
            None
        }
    }
}

/// Runs `tesseract stdin stdout -l <model>` with the image piped as PNG.
#[derive(Debug, Clone)]
pub struct TesseractCommand {
    program: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractCommand {
    pub fn new(tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            tessdata_dir,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, model: &str, png: &[u8]) -> Result<String, String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("stdin").arg("stdout").args(["-l", model]);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(png) {
                drop(stdin);
                if let Err(kill_err) = child.kill() {
                    debug!("tesseract already exited: {kill_err}");
                }
                if let Err(wait_err) = child.wait() {
                    warn!("failed to reap tesseract: {wait_err}");
                }
                return Err(format!("failed to send image to tesseract: {e}"));
            }
        }
        let output = child
            .wait_with_output()
            .map_err(|e| format!("tesseract did not finish: {e}"))?;
        if !output.status.success() {
            return Err(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractCommand {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OcrEngine for TesseractCommand {
    fn recognize_text(&self, model: &str, image: &DynamicImage) -> String {
        let Some(png) = encode_png(&prepare_image(image)) else {
            return String::new();
        };
        match self.run(model, &png) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(model, "OCR failed: {e}");
                String::new()
            }
        }
    }
}

/// In-process Tesseract through `leptess`.
#[cfg(feature = "ocr")]
#[derive(Debug, Clone, Default)]
pub struct LeptessEngine {
    tessdata_dir: Option<PathBuf>,
}

#[cfg(feature = "ocr")]
impl LeptessEngine {
    pub fn new(tessdata_dir: Option<PathBuf>) -> Self {
        Self { tessdata_dir }
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for LeptessEngine {
    fn recognize_text(&self, model: &str, image: &DynamicImage) -> String {
        use leptess::LepTess;

        let Some(png) = encode_png(&prepare_image(image)) else {
            return String::new();
        };
        let dir = self
            .tessdata_dir
            .as_ref()
            .and_then(|d| d.to_str().map(str::to_string));
        let mut lt = match LepTess::new(dir.as_deref(), model) {
            Ok(lt) => lt,
            Err(e) => {
                warn!(model, "failed to initialize tesseract: {e:?}");
                return String::new();
            }
        };
        if let Err(e) = lt.set_image_from_mem(&png) {
            warn!(model, "failed to load OCR input: {e:?}");
            return String::new();
        }
        lt.get_utf8_text()
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Default engine for this build.
pub fn default_engine(tessdata_dir: Option<PathBuf>) -> Box<dyn OcrEngine> {
    #[cfg(feature = "ocr")]
    {
        Box::new(LeptessEngine::new(tessdata_dir))
    }
    #[cfg(not(feature = "ocr"))]
    {
        Box::new(TesseractCommand::new(tessdata_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_model_stems_with_extension() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["eng.traineddata", "deu.traineddata", "notes.txt", "osd.TRAINEDDATA"] {
            fs::write(dir.path().join(name), b"").expect("write model");
        }
        fs::create_dir(dir.path().join("sub.traineddata")).expect("mkdir");

        let models = list_models(dir.path(), "traineddata").expect("list models");
        assert_eq!(
            models.into_iter().collect::<Vec<_>>(),
            vec!["deu".to_string(), "eng".to_string()]
        );
    }

    #[test]
    fn leading_dot_in_extension_is_ignored() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("eng.traineddata"), b"").expect("write model");
        let models = list_models(dir.path(), ".traineddata").expect("list models");
        assert!(models.contains("eng"));
    }

    #[test]
    fn empty_directory_yields_empty_set() {
        let dir = TempDir::new().expect("tempdir");
        assert!(list_models(dir.path(), "traineddata")
            .expect("list models")
            .is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(matches!(
            list_models(Path::new("/nonexistent/tessdata"), "traineddata"),
            Err(OcrError::ModelsDirNotFound(_))
        ));
    }

    #[test]
    fn missing_tesseract_binary_yields_empty_text() {
        let engine = TesseractCommand::default().with_program("/nonexistent/tesseract");
        let image = DynamicImage::new_rgb8(20, 20);
        assert_eq!(engine.recognize_text("eng", &image), "");
    }

    #[cfg(unix)]
    #[test]
    fn tesseract_exiting_early_is_reported_and_reaped() {
        // Larger than any pipe buffer.
        let payload = vec![0u8; 4 * 1024 * 1024];

        // `true` ignores its arguments and exits without reading stdin.
        let engine = TesseractCommand::default().with_program("true");
        let err = engine.run("eng", &payload).unwrap_err();
        assert!(err.contains("failed to send image"), "got: {err}");
    }

    #[test]
    fn prepare_image_converts_to_grayscale() {
        let image = DynamicImage::new_rgb8(4, 4);
        assert!(matches!(prepare_image(&image), DynamicImage::ImageLuma8(_)));
    }
}
