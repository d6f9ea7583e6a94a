use clap::{Parser, Subcommand, ValueEnum};
use clerk_lib::Region;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clerk")]
#[command(
    version,
    about = "Clerk - rename scanned images and PDFs from text found on the page",
    long_about = "Clerk\n\nModes:\n- models: list the OCR models available in the models directory.\n- name: fill a template with fragments and print the resulting file name.\n- ocr: recognize text in a region of an image or PDF page.\n- rename: generate names for a row table and rename the files in place.\n- session: replay a script of actions through the interactive command dispatcher.\n\nTemplates use positional placeholders: $0$, $1$, ... refer to the row's fragment columns.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for models dir, template, selection and zoom limits; defaults to ./clerk.toml when present; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available OCR models
    Models {
        #[arg(long, value_name = "DIR", help = "Directory to scan for models")]
        models_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Fill a template with fragments and print the file name
    Name {
        #[arg(long, help = "Template with $0$, $1$, ... placeholders")]
        template: String,

        #[arg(help = "Fragments for $0$, $1$, ... in order")]
        fragments: Vec<String>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Recognize text in an image or PDF page
    Ocr {
        #[arg(long, help = "Image (png, jpg, jpeg) or PDF file")]
        input: PathBuf,

        #[arg(long, default_value = "0", help = "Zero-based page index for PDFs")]
        page: usize,

        #[arg(
            long,
            help = "Region in image pixels as X,Y,WIDTHxHEIGHT (whole page if omitted)"
        )]
        region: Option<Region>,

        #[arg(long, help = "OCR model (defaults to config default_model or the first model found)")]
        model: Option<String>,

        #[arg(long, value_name = "DIR", help = "Directory to scan for models")]
        models_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Generate names for a row table and rename the files
    Rename {
        #[arg(
            long,
            help = "Row table (JSON, or YAML by .yaml/.yml extension): {template?, rows: [{source, fragments}]}"
        )]
        table: PathBuf,

        #[arg(long, help = "Template (overrides the table's and the config's)")]
        template: Option<String>,

        #[arg(long, help = "Report destinations without renaming anything")]
        dry_run: bool,

        #[arg(long, help = "Stop at the first failed rename instead of continuing")]
        stop_on_error: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Replay a script of actions through the command dispatcher
    Session {
        #[arg(
            long,
            help = "JSON or YAML list of actions, e.g. [{\"action\": \"open-image\", \"path\": \"scan.jpg\"}]"
        )]
        script: PathBuf,

        #[arg(long, help = "Row table to load before replaying")]
        table: Option<PathBuf>,

        #[arg(long, help = "Write the resulting row table to this file")]
        save_table: Option<PathBuf>,

        #[arg(long, value_name = "DIR", help = "Directory to scan for models")]
        models_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
