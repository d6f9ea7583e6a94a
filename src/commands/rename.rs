use std::path::PathBuf;
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{
    rename_all, unresolved, ClerkError, ClerkOutput, RenameOptions, RenameOutput, TableFile,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_rename, render_error, write_output};
use crate::settings::{format_effective_config, load_config};

/// Run the rename command.
#[allow(clippy::too_many_arguments)]
pub fn run_rename(
    config_path: Option<PathBuf>,
    verbose: bool,
    table: PathBuf,
    template: Option<String>,
    dry_run: bool,
    stop_on_error: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        eprintln!("{}", format_effective_config(&config, config_path.as_deref()));
    }

    let table_file = match TableFile::load(&table) {
        Ok(t) => t,
        Err(err) => return render_error(err.into(), format, output),
    };
    // Priority: --template > table template > config template.
    let template = template
        .or_else(|| table_file.template.clone())
        .unwrap_or_else(|| config.template.clone());
    if template.is_empty() {
        return render_error(
            ClerkError::Config(
                "No template given; pass --template or set one in the table or config".to_string(),
            ),
            format,
            output,
        );
    }

    let mut rows = table_file.to_store();
    rows.generate_names(&template);
    let missing = unresolved(&template, rows.columns());
    if !missing.is_empty() {
        tracing::warn!(?missing, "template placeholders without a column");
    }
    if verbose {
        eprintln!(
            "Renaming {} row(s) with template {:?}{}",
            rows.len(),
            template,
            if dry_run { " (dry run)" } else { "" }
        );
    }

    let report = rename_all(
        rows.rows(),
        RenameOptions {
            stop_on_error,
            dry_run,
        },
    );
    let code = exit_code_for_rename(&report);

    let body = ClerkOutput::Rename(RenameOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        template,
        dry_run,
        rows: rows.into_rows(),
        report,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(ClerkError::Config(err.to_string()), format, output);
    }
    code
}
