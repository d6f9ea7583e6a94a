mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_models, run_name, run_ocr, run_rename, run_session};

fn main() -> ExitCode {
    let args = cli::parse();
    settings::init_logging(args.verbose);

    match args.command {
        Commands::Models {
            models_dir,
            format,
            output,
        } => run_models(args.config, args.verbose, models_dir, format, output),
        Commands::Name {
            template,
            fragments,
            format,
            output,
        } => run_name(template, fragments, format, output),
        Commands::Ocr {
            input,
            page,
            region,
            model,
            models_dir,
            format,
            output,
        } => run_ocr(
            args.config,
            args.verbose,
            input,
            page,
            region,
            model,
            models_dir,
            format,
            output,
        ),
        Commands::Rename {
            table,
            template,
            dry_run,
            stop_on_error,
            format,
            output,
        } => run_rename(
            args.config,
            args.verbose,
            table,
            template,
            dry_run,
            stop_on_error,
            format,
            output,
        ),
        Commands::Session {
            script,
            table,
            save_table,
            models_dir,
            format,
            output,
        } => run_session(
            args.config,
            args.verbose,
            script,
            table,
            save_table,
            models_dir,
            format,
            output,
        ),
    }
}
