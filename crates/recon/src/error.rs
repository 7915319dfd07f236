use std::fmt;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// The personal IMDB export (dataset A).
    Catalog,
    /// The Werstreamt.es export (dataset B).
    Streaming,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, bad delimiter, etc.).
    ConfigValidation(String),
    /// Required column missing from an input table.
    Schema { dataset: Dataset, column: String },
    /// Input table unreadable or malformed.
    Load { dataset: Dataset, message: String },
    /// Remote lookup for one identifier failed.
    Network { imdb_id: String, message: String },
    /// Output file could not be written.
    Export(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Schema { dataset, column } => {
                write!(f, "{dataset} table: missing column '{column}'")
            }
            Self::Load { dataset, message } => {
                write!(f, "{dataset} table: cannot load: {message}")
            }
            Self::Network { imdb_id, message } => {
                write!(f, "lookup of '{imdb_id}' failed: {message}")
            }
            Self::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
