use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the IMDB export. Identity is the row position in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub index: usize,
    pub title: String,
    pub original_title: String,
    /// `None` when the column is absent or the cell is empty.
    pub url: Option<String>,
    /// Every cell of the row, verbatim, aligned with [`Catalog::headers`].
    pub fields: Vec<String>,
}

/// The loaded IMDB export: header row plus typed rows.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub headers: Vec<String>,
    pub rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Value of `column` in `row`, or `None` when the column doesn't exist.
    pub fn value<'a>(&self, row: &'a CatalogRow, column: &str) -> Option<&'a str> {
        self.column_index(column)
            .and_then(|i| row.fields.get(i))
            .map(|s| s.as_str())
    }
}

/// One row of the Werstreamt.es export. Only the title fields matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingRow {
    pub title: String,
    pub original_title: String,
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

/// A catalog row whose titles were not found in the streaming table.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub row: CatalogRow,
    /// `tt\d+` extracted from the URL; empty when there is none.
    pub imdb_id: String,
}

impl CandidateRow {
    pub fn has_id(&self) -> bool {
        !self.imdb_id.is_empty()
    }
}

/// Why a row ended up in the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBasis {
    /// The remote search returned its "no results" page.
    Confirmed,
    /// No IMDB id to look up; kept by policy.
    Unidentified,
    /// Verification was switched off for this run.
    Unverified,
}

impl std::fmt::Display for MissingBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Unidentified => write!(f, "unidentified"),
            Self::Unverified => write!(f, "unverified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedMissingRow {
    pub candidate: CandidateRow,
    pub basis: MissingBasis,
}

impl ConfirmedMissingRow {
    pub fn row(&self) -> &CatalogRow {
        &self.candidate.row
    }

    pub fn imdb_id(&self) -> &str {
        &self.candidate.imdb_id
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconSummary {
    pub catalog_rows: usize,
    pub streaming_rows: usize,
    pub candidates: usize,
    pub candidates_with_id: usize,
    pub confirmed: usize,
    pub refuted: usize,
    pub unverifiable: usize,
    pub unidentified_kept: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub verified: bool,
}

impl ReconMeta {
    pub fn now(verified: bool) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            verified,
        }
    }
}

/// Serializable view of a finished run. Rows are emitted as objects keyed
/// by export column name, in export column order.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone)]
pub struct ResultRow {
    pub basis: MissingBasis,
    pub columns: Vec<(String, String)>,
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry("basis", &self.basis)?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
