//! `streamgap compare` / `streamgap check`: reconcile the two exports and
//! confirm candidates against the Werstreamt.es search.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use streamgap_client::WerstreamtClient;
use streamgap_recon::export::{export_to_path, to_result};
use streamgap_recon::model::ReconMeta;
use streamgap_recon::verify::{cancel_token, verify, CancelToken, VerifyOptions};
use streamgap_recon::{ConfirmedMissingRow, MarkerRule, ReconConfig};

use crate::exit_codes::{EXIT_CANCELLED, EXIT_CLIENT, EXIT_LOAD};
use crate::settings::{self, Overrides};
use crate::{table, CliError};

pub struct CompareArgs {
    pub imdb: PathBuf,
    pub streaming: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
    pub overrides: Overrides,
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_LOAD,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Flip the token on Ctrl-C. Verification stops before its next lookup.
fn install_ctrlc(token: &CancelToken) {
    let token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || token.store(true, Ordering::Relaxed)) {
        log::warn!("cannot install Ctrl-C handler: {e}");
    }
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ReconConfig, CliError> {
    let mut config = settings::load(path)?;
    overrides.apply(&mut config)?;
    Ok(config)
}

pub fn cmd_check(
    imdb: PathBuf,
    streaming: PathBuf,
    config: Option<PathBuf>,
    delimiter: Option<char>,
) -> Result<(), CliError> {
    let overrides = Overrides { delimiter, ..Overrides::default() };
    let config = load_config(config.as_deref(), overrides)?;
    let recon = streamgap_recon::run(&config, &read_input(&imdb)?, &read_input(&streaming)?)
        .map_err(CliError::recon)?;

    println!(
        "Loaded {}: {} rows, {}: {} rows",
        file_label(&imdb),
        recon.catalog.rows.len(),
        file_label(&streaming),
        recon.streaming_rows,
    );
    println!(
        "{} potentially missing entries ({} with an IMDB ID)",
        recon.candidates.len(),
        recon.candidates_with_id(),
    );
    Ok(())
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let CompareArgs { imdb, streaming, config, output, json, quiet, overrides } = args;
    let config = load_config(config.as_deref(), overrides)?;
    let delimiter = config.csv.delimiter_byte().map_err(CliError::recon)?;

    let recon = streamgap_recon::run(&config, &read_input(&imdb)?, &read_input(&streaming)?)
        .map_err(CliError::recon)?;

    if !quiet {
        eprintln!(
            "Loaded {}: {} rows, {}: {} rows",
            file_label(&imdb),
            recon.catalog.rows.len(),
            file_label(&streaming),
            recon.streaming_rows,
        );
        eprintln!("Found {} potentially missing entries.", recon.candidates.len());
    }

    let mut summary = recon.summary();
    let verify_enabled = config.verify.enabled && !recon.candidates.is_empty();

    let rows: Vec<ConfirmedMissingRow> = if verify_enabled {
        if recon.candidates_with_id() == 0 && !quiet {
            eprintln!("warning: No valid IMDB IDs found in the missing entries.");
        }

        let client = WerstreamtClient::from_config(&config.verify).map_err(|e| CliError {
            code: EXIT_CLIENT,
            message: e.to_string(),
            hint: None,
        })?;
        let rule = MarkerRule::new(config.verify.marker.clone());
        let options = VerifyOptions::from(&config.verify);
        let cancel = cancel_token();
        install_ctrlc(&cancel);

        let report = verify(&recon.candidates, &client, &rule, &options, &cancel, |p| {
            if !quiet {
                eprint!("\rVerifying entries... ({}/{})", p.completed, p.total);
                if p.completed == p.total {
                    eprintln!();
                }
            }
        });
        if report.cancelled && !quiet {
            eprintln!();
        }
        report.apply_to(&mut summary);
        report.rows
    } else {
        recon.unverified()
    };

    if let Some(ref path) = output {
        if rows.is_empty() && !quiet {
            eprintln!("No data to export; writing header only.");
        }
        export_to_path(path, &recon.catalog.headers, &rows, delimiter).map_err(CliError::recon)?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json {
        let result = to_result(&recon.catalog.headers, &rows, summary.clone(), ReconMeta::now(verify_enabled));
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if !rows.is_empty() {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", table::render(&recon.catalog.headers, &rows))
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    if !quiet {
        if rows.is_empty() {
            eprintln!("No missing entries found");
        } else if verify_enabled {
            eprintln!("Found {} confirmed missing entries in {}", rows.len(), file_label(&imdb));
        } else {
            eprintln!("Found {} missing entries in {} (not verified)", rows.len(), file_label(&imdb));
        }
    }

    if summary.cancelled {
        return Err(CliError {
            code: EXIT_CANCELLED,
            message: "verification cancelled".into(),
            hint: Some("the result above only covers entries verified before the interruption".into()),
        });
    }
    Ok(())
}
