// streamgap - which titles of an IMDB export are not on Werstreamt.es

mod compare;
mod exit_codes;
mod settings;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use streamgap_recon::ReconError;

#[derive(Parser)]
#[command(name = "streamgap")]
#[command(about = "Find IMDB titles that Werstreamt.es does not list")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare both exports and confirm missing titles online
    #[command(after_help = "\
Examples:
  streamgap compare IMDB.csv Werstreamtes.csv
  streamgap compare IMDB.csv Werstreamtes.csv --output missing_movies.csv
  streamgap compare IMDB.csv Werstreamtes.csv --no-verify --json
  streamgap compare IMDB.csv Werstreamtes.csv --drop-unidentified --delay-ms 500")]
    Compare {
        /// IMDB export (needs 'Title' and 'Original Title')
        imdb: PathBuf,

        /// Werstreamt.es export (needs 'Title' and 'OriginalTitle')
        streaming: PathBuf,

        /// Config file (default: <config dir>/streamgap/config.toml if present)
        #[arg(long, env = "STREAMGAP_CONFIG")]
        config: Option<PathBuf>,

        /// Write the missing titles as CSV
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Skip the online check; report every title-match miss
        #[arg(long)]
        no_verify: bool,

        /// Leave out misses whose URL has no IMDB ID
        #[arg(long)]
        drop_unidentified: bool,

        /// Search endpoint (the id is sent as the query parameter)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Page text that means "no results"
        #[arg(long)]
        marker: Option<String>,

        /// Pause between lookups, in milliseconds
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Per-request timeout, in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,

        /// CSV delimiter for both inputs and the export
        #[arg(long)]
        delimiter: Option<char>,

        /// Suppress status lines on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Load and validate both exports without going online
    #[command(after_help = "\
Examples:
  streamgap check IMDB.csv Werstreamtes.csv")]
    Check {
        imdb: PathBuf,
        streaming: PathBuf,

        #[arg(long, env = "STREAMGAP_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long)]
        delimiter: Option<char>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("STREAMGAP_GIT_HASH"), ")",
        "\ntarget:  ", env!("STREAMGAP_TARGET"),
    )
}

/// Logger on stderr; level from `-v`, `RUST_LOG` wins when set.
fn setup_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.format_timestamp_millis();
    builder.format_target(false);
    builder.parse_default_env();

    if let Err(e) = builder.try_init() {
        eprintln!("warning: could not initialize logger: {e}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            imdb,
            streaming,
            config,
            output,
            json,
            no_verify,
            drop_unidentified,
            base_url,
            marker,
            delay_ms,
            timeout_secs,
            delimiter,
            quiet,
        } => compare::cmd_compare(compare::CompareArgs {
            imdb,
            streaming,
            config,
            output,
            json,
            quiet,
            overrides: settings::Overrides {
                no_verify,
                drop_unidentified,
                base_url,
                marker,
                delay_ms,
                timeout_secs,
                delimiter,
            },
        }),
        Commands::Check { imdb, streaming, config, delimiter } => {
            compare::cmd_check(imdb, streaming, config, delimiter)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::Schema { .. } => Some(
                "IMDB exports need 'Title' and 'Original Title', Werstreamt.es exports \
                 'Title' and 'OriginalTitle'; other names go in [catalog] / [streaming] of the config"
                    .to_string(),
            ),
            ReconError::Load { .. } => {
                Some("is the file a CSV export? try --delimiter for ';' separated files".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
