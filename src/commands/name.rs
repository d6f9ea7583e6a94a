use std::path::PathBuf;
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{generate_name, unresolved, ClerkError, ClerkOutput, NameOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};

/// Run the name command. Pure; never touches config or the file system.
pub fn run_name(
    template: String,
    fragments: Vec<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let name = generate_name(&template, &fragments);
    let missing = unresolved(&template, fragments.len());
    if !missing.is_empty() {
        tracing::warn!(?missing, "template placeholders without a fragment");
    }

    let body = ClerkOutput::Name(NameOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        template,
        fragments,
        name,
        unresolved: missing,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(ClerkError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
