use std::path::PathBuf;
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{ClerkError, ClerkOutput, ModelsOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{discover_models, format_effective_config, load_config, resolve_models_dir};

/// Run the models command. No models found is fatal.
pub fn run_models(
    config_path: Option<PathBuf>,
    verbose: bool,
    models_dir: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let mut config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    resolve_models_dir(&mut config, models_dir);
    if verbose {
        eprintln!("{}", format_effective_config(&config, config_path.as_deref()));
    }

    let models = match discover_models(&config) {
        Ok(models) => models,
        Err(err) => return render_error(err, format, output),
    };

    let body = ClerkOutput::Models(ModelsOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        models_dir: config.models_dir.clone(),
        models: models.into_iter().collect(),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(ClerkError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
