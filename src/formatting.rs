use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clerk_lib::output::CLERK_OUTPUT_VERSION;
use clerk_lib::{ClerkError, ClerkOutput, ErrorOutput, RenameReport, RenameStatus, Status};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &ClerkOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: ClerkError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::error!("{err}");
    let error_payload = err.to_payload();
    let payload = ClerkOutput::Error(ErrorOutput {
        version: CLERK_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Exit code 2 is fatal; partial rename failures use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &ClerkOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &ClerkOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &ClerkOutput, colorize: bool) -> String {
    match body {
        ClerkOutput::Name(out) => {
            let mut buf = String::new();
            writeln!(buf, "{}", out.name).ok();
            if !out.unresolved.is_empty() {
                let tokens: Vec<String> = out.unresolved.iter().map(|i| format!("${i}$")).collect();
                let warning = color("warning:", "33", colorize);
                writeln!(buf, "{warning} no fragment for {}", tokens.join(", ")).ok();
            }
            buf
        }
        ClerkOutput::Models(out) => {
            let mut buf = String::new();
            let header = color("[MODELS]", "36", colorize);
            writeln!(
                buf,
                "{} {} model(s) in {}",
                header,
                out.models.len(),
                out.models_dir.display()
            )
            .ok();
            for model in &out.models {
                writeln!(buf, "- {model}").ok();
            }
            buf
        }
        ClerkOutput::Ocr(out) => {
            let mut buf = String::new();
            let header = color("[OCR]", "36", colorize);
            let region = out
                .region
                .map(|r| r.to_string())
                .unwrap_or_else(|| "full page".to_string());
            writeln!(
                buf,
                "{} {} page {} ({}) with model {}",
                header,
                out.input.display(),
                out.page + 1,
                region,
                out.model
            )
            .ok();
            if out.text.is_empty() {
                writeln!(buf, "{}", color("(no text recognized)", "33", colorize)).ok();
            } else {
                writeln!(buf, "{}", out.text).ok();
            }
            buf
        }
        ClerkOutput::Rename(out) => {
            let mut buf = String::new();
            let failed = out.report.has_failures();
            let status = if failed { "FAIL" } else { "OK" };
            let status_colored = color(status, if failed { "31" } else { "32" }, colorize);
            let mode = if out.dry_run { " (dry run)" } else { "" };
            writeln!(buf, "{} Batch rename{} with template {}", status_colored, mode, out.template).ok();
            format_report(&mut buf, &out.report, colorize);
            buf
        }
        ClerkOutput::Session(out) => {
            let mut buf = String::new();
            let header = color("[SESSION]", "34", colorize);
            writeln!(
                buf,
                "{} model {}, template {}, {} row(s)",
                header,
                out.model,
                out.template,
                out.rows.len()
            )
            .ok();
            for status in &out.statuses {
                match status {
                    Status::Info(msg) => writeln!(buf, "- {msg}").ok(),
                    Status::Warning(msg) => {
                        writeln!(buf, "- {} {msg}", color("warning:", "33", colorize)).ok()
                    }
                    Status::Ignored => None,
                };
            }
            if let Some(report) = &out.report {
                format_report(&mut buf, report, colorize);
            }
            buf
        }
        ClerkOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn format_report(buf: &mut String, report: &RenameReport, colorize: bool) {
    for outcome in &report.outcomes {
        let destination = outcome
            .destination
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let (label, code, detail) = match &outcome.status {
            RenameStatus::Renamed => ("renamed", "32", String::new()),
            RenameStatus::Planned => ("planned", "36", String::new()),
            RenameStatus::Unchanged => ("unchanged", "37", String::new()),
            RenameStatus::Skipped { reason } => ("skipped", "33", format!(" ({reason})")),
            RenameStatus::Failed { error } => ("failed", "31", format!(" ({error})")),
            RenameStatus::NotAttempted => ("not attempted", "33", String::new()),
        };
        writeln!(
            buf,
            "- [{}] {} -> {}{}",
            color(label, code, colorize),
            outcome.source.display(),
            destination,
            detail
        )
        .ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Exit code for a finished rename: 1 when any row failed.
pub fn exit_code_for_rename(report: &RenameReport) -> ExitCode {
    if report.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
