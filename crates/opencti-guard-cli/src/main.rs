//! opencti-guard CLI
//!
//! Validates OpenCTI integration options, classifies runtime errors, and
//! answers permission queries from the command line.

mod input;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use opencti_guard_core::config::DEFAULT_CONFIG_FILE;
use opencti_guard_core::{
    ErrorLike, GuardConfig, create_error_response, generate_schema, permissions_for_item_type,
    should_suppress_results, validate_options_with_config,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
const LOG_ENV: &str = "OPENCTI_GUARD_LOG";

#[derive(Parser)]
#[command(name = "opencti-guard")]
#[command(
    author,
    version,
    about = "Validate OpenCTI integration options and classify OpenCTI errors"
)]
struct Cli {
    /// Config file (defaults to .opencti-guard.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an options JSON document
    Validate {
        /// Options file, or `-` for stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Classify a runtime error and print the error response
    Classify(ClassifyArgs),
    /// Print the permissions an options document grants for an item type
    Permissions {
        /// Options file, or `-` for stdin
        file: PathBuf,

        /// Singular item type, e.g. `indicator` or `observable`
        #[arg(long)]
        item_type: String,
    },
    /// Print the JSON schema for the config file
    Schema,
    /// List option rules
    Rules,
}

#[derive(Args)]
struct ClassifyArgs {
    /// Error message
    #[arg(long, required_unless_present = "json", conflicts_with = "json")]
    message: Option<String>,

    /// Error type name
    #[arg(long = "type", requires = "message")]
    kind: Option<String>,

    /// Error stack trace
    #[arg(long, requires = "message")]
    stack: Option<String>,

    /// Read the error as JSON (`{"message", "type", "stack"}`) from a file, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Only print whether results should be suppressed
    #[arg(long)]
    suppress_check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Exit code for a systemic fault (bad input document, failed rule).
const EXIT_FAULT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(EXIT_FAULT)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Validate { file, format } => {
            let config = load_config(cli.config.as_deref());
            validate(&file, format, &config)
        }
        Commands::Classify(args) => classify(args),
        Commands::Permissions { file, item_type } => {
            let options = input::read_json(&file)?;
            let permissions = permissions_for_item_type(&options, &item_type);
            output::print_json(&permissions)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema => {
            output::print_json(&generate_schema())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rules => {
            let config = load_config(cli.config.as_deref());
            output::print_rules(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Resolve the config: explicit `--config`, else the default file when present.
///
/// Load failures and unknown rule ids are reported on stderr; validation then
/// proceeds with whatever could be loaded.
fn load_config(explicit: Option<&Path>) -> GuardConfig {
    let path = explicit.map(Path::to_path_buf).or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    });

    match &path {
        Some(p) => debug!(path = %p.display(), "loading config file"),
        None => debug!("no config file found, using default configuration"),
    }

    let (config, warning) = GuardConfig::load_or_default(path.as_ref());
    if let Some(warning) = warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    for warning in config.validate() {
        eprintln!(
            "{} {}: {}",
            "warning:".yellow().bold(),
            warning.field,
            warning.message
        );
        if let Some(suggestion) = warning.suggestion {
            eprintln!("  {} {}", "help:".cyan(), suggestion);
        }
    }
    config
}

fn validate(file: &Path, format: OutputFormat, config: &GuardConfig) -> Result<ExitCode> {
    let options = input::read_json(file)?;
    let errors = match validate_options_with_config(&options, config) {
        Ok(errors) => errors,
        Err(fault) => {
            eprintln!("{} {}", "error:".red().bold(), fault);
            return Ok(ExitCode::from(EXIT_FAULT));
        }
    };

    match format {
        OutputFormat::Text => output::print_violations_text(&errors),
        OutputFormat::Json => output::print_violations_json(&errors)?,
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn classify(args: ClassifyArgs) -> Result<ExitCode> {
    let error = match (&args.json, args.message) {
        (Some(path), _) => {
            let value = input::read_json(path)?;
            serde_json::from_value::<ErrorLike>(value).with_context(|| {
                format!(
                    "Expected an error object with a 'message' string in {}",
                    input::describe(path)
                )
            })?
        }
        (None, Some(message)) => {
            let mut error = ErrorLike::new(message);
            error.kind = args.kind;
            error.stack = args.stack;
            error
        }
        (None, None) => anyhow::bail!("either --message or --json is required"),
    };

    if args.suppress_check {
        println!("{}", should_suppress_results(&error));
    } else {
        output::print_json(&create_error_response(&error))?;
    }
    Ok(ExitCode::SUCCESS)
}
