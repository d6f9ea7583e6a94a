use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PdfConfig;
use crate::selection::CropRect;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Unsupported file extension '{extension}'. Supported: {supported}.")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },
    #[error("Failed to rasterize PDF: {0}")]
    Rasterize(String),
    #[error("PDF produced no pages: {0}")]
    NoPages(String),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl DocumentKind {
    pub fn detect(path: &Path) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if extension == "pdf" {
            Ok(DocumentKind::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(DocumentKind::Image)
        } else {
            Err(DocumentError::UnsupportedExtension {
                extension,
                supported: format!("{}, pdf", IMAGE_EXTENSIONS.join(", ")),
            })
        }
    }
}

/// Pages of one opened file, with a cursor on the displayed page.
#[derive(Debug)]
pub struct Document {
    source: PathBuf,
    pages: Vec<DynamicImage>,
    index: usize,
}

impl Document {
    pub fn open(path: &Path, pdf: &PdfConfig) -> Result<Self, DocumentError> {
        match DocumentKind::detect(path)? {
            DocumentKind::Image => Self::open_image(path),
            DocumentKind::Pdf => Self::open_pdf(path, pdf),
        }
    }

    pub fn open_image(path: &Path) -> Result<Self, DocumentError> {
        if DocumentKind::detect(path)? != DocumentKind::Image {
            return Err(DocumentError::UnsupportedExtension {
                extension: "pdf".to_string(),
                supported: IMAGE_EXTENSIONS.join(", "),
            });
        }
        if !path.exists() {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }
        let image = image::open(path)?;
        debug!(path = %path.display(), dims = ?image.dimensions(), "opened image");
        Ok(Self::from_pages(path, vec![image]))
    }

    /// Rasterize every page with `pdftoppm` into a scratch directory that
    /// is removed once the pages are decoded.
    pub fn open_pdf(path: &Path, pdf: &PdfConfig) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }
        let scratch = tempfile::tempdir().map_err(|e| DocumentError::Rasterize(e.to_string()))?;
        let prefix = scratch.path().join("page");

        let output = Command::new(&pdf.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(pdf.dpi.to_string())
            .arg(path)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                DocumentError::Rasterize(format!(
                    "failed to run {}: {e} (install poppler-utils)",
                    pdf.pdftoppm.display()
                ))
            })?;
        if !output.status.success() {
            return Err(DocumentError::Rasterize(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(scratch.path())
            .map_err(|e| DocumentError::Rasterize(e.to_string()))?
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
            .collect();
        files.sort_by_key(|p| page_number(p));

        let mut pages = Vec::with_capacity(files.len());
        for file in &files {
            pages.push(image::open(file)?);
        }
        if pages.is_empty() {
            return Err(DocumentError::NoPages(path.display().to_string()));
        }
        info!(path = %path.display(), pages = pages.len(), "rasterized PDF");
        Ok(Self::from_pages(path, pages))
    }

    /// Panics if `pages` is empty.
    pub fn from_pages(source: impl Into<PathBuf>, pages: Vec<DynamicImage>) -> Self {
        assert!(!pages.is_empty(), "a document needs at least one page");
        Self {
            source: source.into(),
            pages,
            index: 0,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &DynamicImage {
        &self.pages[self.index]
    }

    /// Advance to the next page, wrapping to the first.
    pub fn next_page(&mut self) -> usize {
        self.index = (self.index + 1) % self.pages.len();
        self.index
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        if page < self.pages.len() {
            self.index = page;
            true
        } else {
            false
        }
    }

    /// Crop the current page, clamped to its bounds.
    pub fn crop(&self, rect: CropRect) -> Option<DynamicImage> {
        let page = self.current();
        let rect = rect.clamp_to(page.width(), page.height())?;
        Some(page.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }
}

/// `pdftoppm` names pages `page-1.png`, `page-02.png`, ... depending on the
/// page count; sort numerically.
fn page_number(path: &Path) -> u32 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}
