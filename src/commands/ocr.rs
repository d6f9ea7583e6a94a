use std::path::PathBuf;
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{default_engine, ClerkError, ClerkOutput, Document, OcrOutput, Region};
use image::GenericImageView;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{
    choose_model, discover_models, format_effective_config, load_config, resolve_models_dir,
};

/// Run the ocr command.
#[allow(clippy::too_many_arguments)]
pub fn run_ocr(
    config_path: Option<PathBuf>,
    verbose: bool,
    input: PathBuf,
    page: usize,
    region: Option<Region>,
    model: Option<String>,
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
    let model = match choose_model(model, &config, &models) {
        Ok(model) => model,
        Err(err) => return render_error(err, format, output),
    };

    if verbose {
        eprintln!("Loading {}\u{2026}", input.display());
    }
    let mut document = match Document::open(&input, &config.pdf) {
        Ok(doc) => doc,
        Err(err) => return render_error(err.into(), format, output),
    };
    if !document.go_to(page) {
        return render_error(
            ClerkError::Config(format!(
                "Page {} out of range; {} has {} page(s)",
                page,
                input.display(),
                document.page_count()
            )),
            format,
            output,
        );
    }

    let image = match region {
        Some(region) => match document.crop(region.into()) {
            Some(image) => image,
            None => {
                return render_error(
                    ClerkError::Config(format!(
                        "Invalid region {region}: outside the {}x{} page",
                        document.current().width(),
                        document.current().height()
                    )),
                    format,
                    output,
                )
            }
        },
        None => document.current().clone(),
    };

    let engine = default_engine(Some(config.models_dir.clone()));
    let text = engine.recognize_text(&model, &image);
    if verbose {
        eprintln!("Recognized {} character(s) with model {}", text.chars().count(), model);
    }

    let body = ClerkOutput::Ocr(OcrOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        input,
        page,
        model,
        region,
        text,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(ClerkError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
