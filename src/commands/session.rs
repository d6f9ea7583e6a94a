use std::path::PathBuf;
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{
    default_engine, load_script, ClerkError, ClerkOutput, Session, SessionOutput, TableFile,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_rename, render_error, write_output};
use crate::settings::{discover_models, format_effective_config, load_config, resolve_models_dir};

/// Run the session command: replay scripted actions through the dispatcher.
#[allow(clippy::too_many_arguments)]
pub fn run_session(
    config_path: Option<PathBuf>,
    verbose: bool,
    script: PathBuf,
    table: Option<PathBuf>,
    save_table: Option<PathBuf>,
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
    let actions = match load_script(&script) {
        Ok(actions) => actions,
        Err(err) => return render_error(err.into(), format, output),
    };
    let initial_table = match table.as_deref().map(TableFile::load).transpose() {
        Ok(t) => t,
        Err(err) => return render_error(err.into(), format, output),
    };

    let engine = default_engine(Some(config.models_dir.clone()));
    let mut session = match Session::new(config, models, engine) {
        Ok(session) => session,
        Err(err) => return render_error(err.into(), format, output),
    };
    if let Some(t) = &initial_table {
        session.load_table(t);
    }

    let mut statuses = Vec::with_capacity(actions.len());
    for action in actions {
        let status = session.dispatch(action);
        if verbose {
            if let Some(message) = status.message() {
                eprintln!("{message}");
            }
        }
        statuses.push(status);
    }

    if let Some(path) = &save_table {
        if let Err(err) = session.to_table().save(path) {
            return render_error(err.into(), format, output);
        }
    }

    let report = session.last_report().cloned();
    let code = report
        .as_ref()
        .map(exit_code_for_rename)
        .unwrap_or(ExitCode::SUCCESS);
    let body = ClerkOutput::Session(SessionOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        model: session.model().to_string(),
        template: session.template().to_string(),
        statuses,
        rows: session.rows().rows().to_vec(),
        report,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(ClerkError::Config(err.to_string()), format, output);
    }
    code
}
