use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clerk_lib::config::LOCAL_CONFIG_FILE;
use clerk_lib::{list_models, ClerkError, Config};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "clerk=debug,clerk_lib=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load config from a TOML file, `./clerk.toml`, or return defaults.
/// Priority: explicit path > ./clerk.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, ClerkError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| LOCAL_CONFIG_FILE.to_string());
        ClerkError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        ClerkError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Merge the `--models-dir` flag into the config.
pub fn resolve_models_dir(config: &mut Config, cli_models_dir: Option<PathBuf>) {
    if let Some(dir) = cli_models_dir {
        config.models_dir = dir;
    }
}

/// Discover models; an empty result is fatal.
pub fn discover_models(config: &Config) -> Result<BTreeSet<String>, ClerkError> {
    let models = list_models(&config.models_dir, &config.model_extension)?;
    if models.is_empty() {
        return Err(ClerkError::NoModels(config.models_dir.display().to_string()));
    }
    tracing::info!("Available models: {:?}", models);
    Ok(models)
}

/// Pick the model to use: explicit flag, config default, or the first found.
pub fn choose_model(
    requested: Option<String>,
    config: &Config,
    models: &BTreeSet<String>,
) -> Result<String, ClerkError> {
    if let Some(model) = requested {
        if models.contains(&model) {
            return Ok(model);
        }
        return Err(ClerkError::Config(format!(
            "Unknown model '{}'; available: {}",
            model,
            models.iter().cloned().collect::<Vec<_>>().join(", ")
        )));
    }
    config
        .default_model
        .as_ref()
        .filter(|m| models.contains(*m))
        .or_else(|| models.iter().next())
        .cloned()
        .ok_or_else(|| ClerkError::NoModels(config.models_dir.display().to_string()))
}

/// Single-line summary of the effective config (verbose mode), naming the
/// file it was loaded from.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = Config::source_path(config_source)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: models_dir={}, extension={}, default_model={}, template={:?}, selection>={}x{}, zoom={:.2}..{:.2} (default {:.2}), pdf dpi={}",
        config.models_dir.display(),
        config.model_extension,
        config.default_model.as_deref().unwrap_or("-"),
        config.template,
        config.selection.min_width,
        config.selection.min_height,
        config.zoom.min,
        config.zoom.max,
        config.zoom.default,
        config.pdf.dpi,
    )
}
