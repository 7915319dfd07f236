//! Column layout and CSV export of the result set.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ReconError;
use crate::model::{ConfirmedMissingRow, ReconMeta, ReconResult, ReconSummary, ResultRow};

/// Name of the derived id column.
pub const IMDB_ID_COLUMN: &str = "IMDB ID";

/// Columns shown first, in this order, when the catalog has them.
pub const DISPLAY_COLUMNS: [&str; 7] = [
    IMDB_ID_COLUMN,
    "Title",
    "Original Title",
    "Year",
    "IMDb Rating",
    "Genres",
    "URL",
];

/// Display columns present in `headers` (the id column always is), in
/// display order.
pub fn display_columns(headers: &[String]) -> Vec<String> {
    DISPLAY_COLUMNS
        .iter()
        .filter(|c| **c == IMDB_ID_COLUMN || headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect()
}

/// Display columns followed by every other catalog column in file order.
pub fn export_columns(headers: &[String]) -> Vec<String> {
    let mut columns = display_columns(headers);
    for h in headers {
        if !columns.contains(h) {
            columns.push(h.clone());
        }
    }
    columns
}

/// Raw value of `column` for a result row.
pub fn cell<'a>(headers: &[String], row: &'a ConfirmedMissingRow, column: &str) -> &'a str {
    if column == IMDB_ID_COLUMN {
        return row.imdb_id();
    }
    headers
        .iter()
        .position(|h| h == column)
        .and_then(|i| row.row().fields.get(i))
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Value formatted for on-screen display. `Year` is shown as an integer
/// even when the export stored it as a float (`1999.0`).
pub fn format_cell(column: &str, value: &str) -> String {
    if column == "Year" {
        if let Ok(year) = value.trim().parse::<f64>() {
            if year.fract() == 0.0 && year.is_finite() {
                return format!("{}", year as i64);
            }
        }
    }
    value.to_string()
}

/// Write header + one record per row. Values are written verbatim.
pub fn write_confirmed<W: Write>(
    writer: W,
    headers: &[String],
    rows: &[ConfirmedMissingRow],
    delimiter: u8,
) -> Result<(), ReconError> {
    let columns = export_columns(headers);
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    wtr.write_record(&columns).map_err(|e| ReconError::Export(e.to_string()))?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| cell(headers, row, c)))
            .map_err(|e| ReconError::Export(e.to_string()))?;
    }
    wtr.flush().map_err(|e| ReconError::Export(e.to_string()))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Export to `path`. Atomic: the rows go to a temp file next to `path`
/// which is then renamed over it, so a failed export leaves `path` as it was.
pub fn export_to_path(
    path: &Path,
    headers: &[String],
    rows: &[ConfirmedMissingRow],
    delimiter: u8,
) -> Result<(), ReconError> {
    let tmp = temp_path(path);

    let result = std::fs::File::create(&tmp)
        .map_err(|e| ReconError::Export(format!("cannot create {}: {e}", tmp.display())))
        .and_then(|f| write_confirmed(std::io::BufWriter::new(f), headers, rows, delimiter))
        .and_then(|()| {
            std::fs::rename(&tmp, path).map_err(|e| {
                ReconError::Export(format!("cannot rename to {}: {e}", path.display()))
            })
        });

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

/// Serializable result: rows as ordered column/value pairs.
pub fn to_result(
    headers: &[String],
    rows: &[ConfirmedMissingRow],
    summary: ReconSummary,
    meta: ReconMeta,
) -> ReconResult {
    let columns = export_columns(headers);
    let rows = rows
        .iter()
        .map(|row| ResultRow {
            basis: row.basis,
            columns: columns
                .iter()
                .map(|c| (c.clone(), cell(headers, row, c).to_string()))
                .collect(),
        })
        .collect();
    ReconResult { meta, summary, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateRow, CatalogRow, MissingBasis};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn confirmed(fields: &[&str], imdb_id: &str) -> ConfirmedMissingRow {
        ConfirmedMissingRow {
            candidate: CandidateRow {
                row: CatalogRow {
                    index: 0,
                    title: String::new(),
                    original_title: String::new(),
                    url: None,
                    fields: fields.iter().map(|s| s.to_string()).collect(),
                },
                imdb_id: imdb_id.into(),
            },
            basis: MissingBasis::Confirmed,
        }
    }

    #[test]
    fn display_columns_restricted_to_present() {
        let h = headers(&["URL", "Year", "Original Title", "Title", "Const"]);
        assert_eq!(
            display_columns(&h),
            vec!["IMDB ID", "Title", "Original Title", "Year", "URL"]
        );
        assert_eq!(
            export_columns(&h),
            vec!["IMDB ID", "Title", "Original Title", "Year", "URL", "Const"]
        );
    }

    #[test]
    fn catalog_id_column_is_not_duplicated() {
        let h = headers(&["IMDB ID", "Title", "Original Title"]);
        assert_eq!(export_columns(&h), vec!["IMDB ID", "Title", "Original Title"]);
    }

    #[test]
    fn year_formatting() {
        assert_eq!(format_cell("Year", "1999.0"), "1999");
        assert_eq!(format_cell("Year", "2004"), "2004");
        assert_eq!(format_cell("Year", ""), "");
        assert_eq!(format_cell("IMDb Rating", "8.0"), "8.0");
    }

    #[test]
    fn writes_header_and_rows() {
        let h = headers(&["Const", "Title", "Original Title", "URL"]);
        let rows = vec![confirmed(
            &["tt0079944", "Stalker", "Сталкер", "https://www.imdb.com/title/tt0079944/"],
            "tt0079944",
        )];
        let mut out = Vec::new();
        write_confirmed(&mut out, &h, &rows, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "IMDB ID,Title,Original Title,URL,Const\n\
             tt0079944,Stalker,Сталкер,https://www.imdb.com/title/tt0079944/,tt0079944\n"
        );
    }

    #[test]
    fn export_to_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let err = export_to_path(&path, &headers(&["Title"]), &[], b',').unwrap_err();
        assert!(matches!(err, ReconError::Export(_)));
        assert!(!path.exists());
    }

    #[test]
    fn export_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_movies.csv");
        std::fs::write(&path, "old").unwrap();
        export_to_path(&path, &headers(&["Title", "Original Title"]), &[], b',').unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "IMDB ID,Title,Original Title\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn result_rows_follow_export_order() {
        let h = headers(&["Title", "Original Title", "Year"]);
        let rows = vec![confirmed(&["Heat", "Heat", "1995"], "tt0113277")];
        let result = to_result(&h, &rows, ReconSummary::default(), ReconMeta::now(true));
        let json = serde_json::to_value(&result).unwrap();
        let row = &json["rows"][0];
        assert_eq!(row["basis"], "confirmed");
        assert_eq!(row["IMDB ID"], "tt0113277");
        assert_eq!(row["Year"], "1995");
        let names: Vec<&str> = result.rows[0].columns.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["IMDB ID", "Title", "Original Title", "Year"]);
    }
}
