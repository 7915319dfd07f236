//! Config file discovery and command-line overrides.

use std::path::{Path, PathBuf};

use streamgap_recon::{ReconConfig, UnidentifiedPolicy};

use crate::CliError;

/// `<config dir>/streamgap/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("streamgap")
        .join("config.toml")
}

/// Load the explicit config file, else the default one if it exists,
/// else built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path();
            if !p.exists() {
                log::debug!("no config at {}, using defaults", p.display());
                return Ok(ReconConfig::default());
            }
            p
        }
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    log::debug!("using config {}", path.display());
    ReconConfig::from_toml(&text).map_err(|e| CliError::recon(e).with_hint(format!("check {}", path.display())))
}

/// Flags that override the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub no_verify: bool,
    pub drop_unidentified: bool,
    pub base_url: Option<String>,
    pub marker: Option<String>,
    pub delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub delimiter: Option<char>,
}

impl Overrides {
    pub fn apply(self, config: &mut ReconConfig) -> Result<(), CliError> {
        if self.no_verify {
            config.verify.enabled = false;
        }
        if self.drop_unidentified {
            config.verify.unidentified = UnidentifiedPolicy::Drop;
        }
        if let Some(url) = self.base_url {
            config.verify.base_url = url;
        }
        if let Some(marker) = self.marker {
            config.verify.marker = marker;
        }
        if let Some(ms) = self.delay_ms {
            config.verify.delay_ms = ms;
        }
        if let Some(secs) = self.timeout_secs {
            config.verify.timeout_secs = secs;
        }
        if let Some(d) = self.delimiter {
            config.csv.delimiter = d.to_string();
        }
        config.validate().map_err(CliError::recon)
    }
}
