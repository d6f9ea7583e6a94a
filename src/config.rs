use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File picked up from the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "clerk.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for OCR models.
    pub models_dir: PathBuf,
    /// Extension (without dot) identifying a model file.
    pub model_extension: String,
    /// Preferred model; the first discovered model is used when unset or
    /// unavailable.
    pub default_model: Option<String>,
    /// Template applied when a session or table does not carry its own.
    pub template: String,
    pub selection: SelectionLimits,
    pub zoom: ZoomConfig,
    pub pdf: PdfConfig,
}

/// Smallest selection, in image pixels, that is sent to OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionLimits {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            min_width: 10,
            min_height: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Wheel delta that changes the scale by 1.0.
    pub wheel_delta: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 5.0,
            default: 1.0,
            wheel_delta: 8.0 * 360.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    pub dpi: u32,
    /// Rasterizer executable.
    pub pdftoppm: PathBuf,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            pdftoppm: PathBuf::from("pdftoppm"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("/usr/share/tessdata/"),
            model_extension: "traineddata".to_string(),
            default_model: None,
            template: String::new(),
            selection: SelectionLimits::default(),
            zoom: ZoomConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, else `./clerk.toml` if present, else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::source_path(path) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The file [`Config::load`] reads for `path`, or `None` for defaults.
    pub fn source_path(path: Option<&Path>) -> Option<PathBuf> {
        Self::source_path_in(path, Path::new(""))
    }

    fn source_path_in(path: Option<&Path>, dir: &Path) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(dir.join(LOCAL_CONFIG_FILE)).filter(|local| local.is_file()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if zoom.min <= 0.0 || zoom.max <= 0.0 {
            return Err(ConfigError::Invalid(
                "zoom.min and zoom.max must be positive".to_string(),
            ));
        }
        if zoom.min > zoom.max {
            return Err(ConfigError::Invalid(format!(
                "zoom.min ({}) is greater than zoom.max ({})",
                zoom.min, zoom.max
            )));
        }
        if zoom.default < zoom.min || zoom.default > zoom.max {
            return Err(ConfigError::Invalid(format!(
                "zoom.default ({}) must lie within [{}, {}]",
                zoom.default, zoom.min, zoom.max
            )));
        }
        if zoom.wheel_delta == 0.0 {
            return Err(ConfigError::Invalid(
                "zoom.wheel_delta must be non-zero".to_string(),
            ));
        }
        if self.pdf.dpi == 0 {
            return Err(ConfigError::Invalid("pdf.dpi must be positive".to_string()));
        }
        if self.model_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid(
                "model_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
