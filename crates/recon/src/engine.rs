use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::extract::extract_imdb_id;
use crate::load::{load_catalog, load_streaming};
use crate::matcher::TitleIndex;
use crate::model::{
    Catalog, CandidateRow, ConfirmedMissingRow, MissingBasis, ReconSummary, StreamingRow,
};

/// Loaded catalog plus the rows provisionally missing from the streaming table.
#[derive(Debug)]
pub struct Reconciliation {
    pub catalog: Catalog,
    pub streaming_rows: usize,
    pub candidates: Vec<CandidateRow>,
}

impl Reconciliation {
    pub fn candidates_with_id(&self) -> usize {
        self.candidates.iter().filter(|c| c.has_id()).count()
    }

    /// Summary counts known before verification.
    pub fn summary(&self) -> ReconSummary {
        ReconSummary {
            catalog_rows: self.catalog.rows.len(),
            streaming_rows: self.streaming_rows,
            candidates: self.candidates.len(),
            candidates_with_id: self.candidates_with_id(),
            ..ReconSummary::default()
        }
    }

    /// Every candidate as a result row, for runs without remote verification.
    pub fn unverified(&self) -> Vec<ConfirmedMissingRow> {
        self.candidates
            .iter()
            .map(|c| ConfirmedMissingRow { candidate: c.clone(), basis: MissingBasis::Unverified })
            .collect()
    }
}

/// Catalog rows whose title and original title both miss every streaming
/// title field. Stable: candidates keep catalog order.
pub fn reconcile(catalog: &Catalog, streaming: &[StreamingRow]) -> Vec<CandidateRow> {
    let index = TitleIndex::build(streaming);

    catalog
        .rows
        .iter()
        .filter(|row| !index.is_present(row))
        .map(|row| CandidateRow {
            imdb_id: extract_imdb_id(row.url.as_deref()),
            row: row.clone(),
        })
        .collect()
}

/// Load both tables per config and reconcile them. Schema and load errors
/// fail the whole call; there is no partial result.
pub fn run(
    config: &ReconConfig,
    catalog_csv: &str,
    streaming_csv: &str,
) -> Result<Reconciliation, ReconError> {
    let delimiter = config.csv.delimiter_byte()?;
    let catalog = load_catalog(catalog_csv, &config.catalog, delimiter)?;
    let streaming = load_streaming(streaming_csv, &config.streaming, delimiter)?;

    let candidates = reconcile(&catalog, &streaming);
    log::info!(
        "{} of {} catalog rows not found among {} streaming rows",
        candidates.len(),
        catalog.rows.len(),
        streaming.len()
    );

    Ok(Reconciliation {
        catalog,
        streaming_rows: streaming.len(),
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogRow;

    fn row(index: usize, title: &str, original: &str, url: Option<&str>) -> CatalogRow {
        CatalogRow {
            index,
            title: title.into(),
            original_title: original.into(),
            url: url.map(String::from),
            fields: vec![],
        }
    }

    fn streaming(title: &str, original: &str) -> StreamingRow {
        StreamingRow { title: title.into(), original_title: original.into() }
    }

    #[test]
    fn single_missing_row_gets_id() {
        let catalog = Catalog {
            headers: vec![],
            rows: vec![row(0, "Movie X", "Movie X", Some("https://www.imdb.com/title/tt0001/"))],
        };
        let out = reconcile(&catalog, &[streaming("Movie Y", "Movie Y")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].row.index, 0);
        assert_eq!(out[0].imdb_id, "tt0001");
    }

    #[test]
    fn order_is_preserved() {
        let catalog = Catalog {
            headers: vec![],
            rows: vec![
                row(0, "C", "C", None),
                row(1, "Found", "Found", None),
                row(2, "A", "A", None),
                row(3, "B", "B", None),
            ],
        };
        let out = reconcile(&catalog, &[streaming("found", "")]);
        let indices: Vec<usize> = out.iter().map(|c| c.row.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn reconcile_against_itself_is_empty() {
        let rows = vec![
            row(0, "Heat", "Heat", None),
            row(1, "Der Pate", "The Godfather", None),
        ];
        let catalog = Catalog { headers: vec![], rows: rows.clone() };
        let mirror: Vec<StreamingRow> = rows
            .iter()
            .map(|r| streaming(&r.title.to_uppercase(), &r.original_title.to_lowercase()))
            .collect();
        assert!(reconcile(&catalog, &mirror).is_empty());
    }

    #[test]
    fn duplicate_titles_are_kept_per_row() {
        let catalog = Catalog {
            headers: vec![],
            rows: vec![row(0, "Solaris", "Solaris", None), row(1, "Solaris", "Solaris", None)],
        };
        assert_eq!(reconcile(&catalog, &[]).len(), 2);
    }

    #[test]
    fn run_reports_schema_error_for_streaming_table() {
        let catalog_csv = "Title,Original Title\nA,A\n";
        let streaming_csv = "Title\nA\n";
        let err = run(&ReconConfig::default(), catalog_csv, streaming_csv).unwrap_err();
        assert!(err.to_string().contains("OriginalTitle"), "{err}");
    }

    #[test]
    fn run_summary_counts() {
        let catalog_csv = "\
Title,Original Title,URL
Heat,Heat,https://www.imdb.com/title/tt0113277/
Stalker,Сталкер,https://www.imdb.com/title/tt0079944/
Home Movie,Home Movie,
";
        let streaming_csv = "Title,OriginalTitle\nHEAT,Heat\n";
        let recon = run(&ReconConfig::default(), catalog_csv, streaming_csv).unwrap();
        let summary = recon.summary();
        assert_eq!(summary.catalog_rows, 3);
        assert_eq!(summary.streaming_rows, 1);
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.candidates_with_id, 1);

        let unverified = recon.unverified();
        assert!(unverified.iter().all(|r| r.basis == MissingBasis::Unverified));
        assert_eq!(unverified[0].imdb_id(), "tt0079944");
        assert_eq!(unverified[1].imdb_id(), "");
    }
}
