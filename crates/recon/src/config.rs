use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

pub const DEFAULT_BASE_URL: &str = "https://www.werstreamt.es/filme-serien/";
pub const DEFAULT_QUERY_PARAM: &str = "q";
pub const DEFAULT_NO_RESULTS_MARKER: &str = "Deine Suche lieferte leider keine Ergebnisse";
pub const DEFAULT_DELAY_MS: u64 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full run configuration. Every section is optional in the TOML file;
/// missing sections fall back to the defaults of the IMDB and
/// Werstreamt.es export formats.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub catalog: CatalogColumns,
    #[serde(default)]
    pub streaming: StreamingColumns,
    #[serde(default)]
    pub verify: VerifyConfig,
    #[serde(default)]
    pub csv: CsvConfig,
}

impl ReconConfig {
    /// Parse and validate a TOML config string.
    pub fn from_toml(s: &str) -> Result<Self, ReconError> {
        let config: Self = toml::from_str(s).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let columns = [
            ("catalog.title", &self.catalog.title),
            ("catalog.original_title", &self.catalog.original_title),
            ("catalog.url", &self.catalog.url),
            ("streaming.title", &self.streaming.title),
            ("streaming.original_title", &self.streaming.original_title),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        if self.verify.marker.is_empty() {
            return Err(ReconError::ConfigValidation("verify.marker must not be empty".into()));
        }
        if self.verify.query_param.is_empty() {
            return Err(ReconError::ConfigValidation(
                "verify.query_param must not be empty".into(),
            ));
        }
        if self.verify.timeout_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "verify.timeout_secs must be at least 1".into(),
            ));
        }

        self.csv.delimiter_byte()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Column names of the IMDB export (dataset A).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogColumns {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_catalog_original_title")]
    pub original_title: String,
    /// Optional in the input: a table without it yields candidates with no id.
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            title: default_title(),
            original_title: default_catalog_original_title(),
            url: default_url(),
        }
    }
}

/// Column names of the Werstreamt.es export (dataset B).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingColumns {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_streaming_original_title")]
    pub original_title: String,
}

impl Default for StreamingColumns {
    fn default() -> Self {
        Self {
            title: default_title(),
            original_title: default_streaming_original_title(),
        }
    }
}

fn default_title() -> String {
    "Title".into()
}

fn default_catalog_original_title() -> String {
    "Original Title".into()
}

fn default_streaming_original_title() -> String {
    "OriginalTitle".into()
}

fn default_url() -> String {
    "URL".into()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// What to do with candidates whose URL carries no IMDB id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnidentifiedPolicy {
    /// Report them as missing without remote confirmation.
    #[default]
    Keep,
    /// Treat them as unverifiable and leave them out of the result.
    Drop,
}

impl std::fmt::Display for UnidentifiedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// Literal substring of the search page that means "no results".
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Pause between two consecutive lookups.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub unidentified: UnidentifiedPolicy,
}

impl VerifyConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            query_param: default_query_param(),
            marker: default_marker(),
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            unidentified: UnidentifiedPolicy::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_query_param() -> String {
    DEFAULT_QUERY_PARAM.into()
}

fn default_marker() -> String {
    DEFAULT_NO_RESULTS_MARKER.into()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ---------------------------------------------------------------------------
// CSV dialect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsvConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl CsvConfig {
    /// The delimiter as a single byte. Only one ASCII character is accepted.
    pub fn delimiter_byte(&self) -> Result<u8, ReconError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ReconError::ConfigValidation(format!(
                "csv.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { delimiter: default_delimiter() }
    }
}

fn default_delimiter() -> String {
    ",".into()
}
