//! CSV text → typed rows, with the schema check for each dataset.

use crate::config::{CatalogColumns, StreamingColumns};
use crate::error::{Dataset, ReconError};
use crate::model::{Catalog, CatalogRow, StreamingRow};

fn reader(csv_data: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(csv_data.as_bytes())
}

fn read_headers(
    reader: &mut csv::Reader<&[u8]>,
    dataset: Dataset,
) -> Result<Vec<String>, ReconError> {
    Ok(reader
        .headers()
        .map_err(|e| ReconError::Load { dataset, message: e.to_string() })?
        .iter()
        .map(|h| h.to_string())
        .collect())
}

fn required(headers: &[String], dataset: Dataset, name: &str) -> Result<usize, ReconError> {
    headers.iter().position(|h| h == name).ok_or_else(|| ReconError::Schema {
        dataset,
        column: name.into(),
    })
}

/// Load the IMDB export. Title columns are required, the URL column is not.
pub fn load_catalog(
    csv_data: &str,
    columns: &CatalogColumns,
    delimiter: u8,
) -> Result<Catalog, ReconError> {
    let dataset = Dataset::Catalog;
    let mut reader = reader(csv_data, delimiter);
    let headers = read_headers(&mut reader, dataset)?;

    // Same order as the error message the user sees first: original title.
    let original_idx = required(&headers, dataset, &columns.original_title)?;
    let title_idx = required(&headers, dataset, &columns.title)?;
    let url_idx = headers.iter().position(|h| *h == columns.url);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Load { dataset, message: e.to_string() })?;
        let fields: Vec<String> = record.iter().map(|v| v.to_string()).collect();

        let url = url_idx
            .and_then(|i| fields.get(i))
            .filter(|v| !v.trim().is_empty())
            .cloned();

        rows.push(CatalogRow {
            index,
            title: fields.get(title_idx).cloned().unwrap_or_default(),
            original_title: fields.get(original_idx).cloned().unwrap_or_default(),
            url,
            fields,
        });
    }

    log::debug!("loaded {} catalog rows ({} columns)", rows.len(), headers.len());
    Ok(Catalog { headers, rows })
}

/// Load the streaming export. Every other column is ignored.
pub fn load_streaming(
    csv_data: &str,
    columns: &StreamingColumns,
    delimiter: u8,
) -> Result<Vec<StreamingRow>, ReconError> {
    let dataset = Dataset::Streaming;
    let mut reader = reader(csv_data, delimiter);
    let headers = read_headers(&mut reader, dataset)?;

    let original_idx = required(&headers, dataset, &columns.original_title)?;
    let title_idx = required(&headers, dataset, &columns.title)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Load { dataset, message: e.to_string() })?;
        rows.push(StreamingRow {
            title: record.get(title_idx).unwrap_or("").to_string(),
            original_title: record.get(original_idx).unwrap_or("").to_string(),
        });
    }

    log::debug!("loaded {} streaming rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMDB: &str = "\
Const,Your Rating,Title,Original Title,URL,Year,Genres
tt0133093,9,Matrix,The Matrix,https://www.imdb.com/title/tt0133093/,1999,\"Action, Sci-Fi\"
tt0000001,7,Untitled,,,,
";

    #[test]
    fn catalog_keeps_fields_verbatim() {
        let catalog = load_catalog(IMDB, &CatalogColumns::default(), b',').unwrap();
        assert_eq!(catalog.headers.len(), 7);
        assert_eq!(catalog.rows.len(), 2);

        let first = &catalog.rows[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.title, "Matrix");
        assert_eq!(first.original_title, "The Matrix");
        assert_eq!(first.url.as_deref(), Some("https://www.imdb.com/title/tt0133093/"));
        assert_eq!(catalog.value(first, "Genres"), Some("Action, Sci-Fi"));
        assert_eq!(catalog.value(first, "Nope"), None);

        let second = &catalog.rows[1];
        assert_eq!(second.index, 1);
        assert_eq!(second.original_title, "");
        assert_eq!(second.url, None);
    }

    #[test]
    fn catalog_without_url_column_is_fine() {
        let csv = "Title,Original Title\nA,B\n";
        let catalog = load_catalog(csv, &CatalogColumns::default(), b',').unwrap();
        assert_eq!(catalog.rows[0].url, None);
    }

    #[test]
    fn catalog_missing_original_title_is_schema_error() {
        let csv = "Title,URL\nA,x\n";
        let err = load_catalog(csv, &CatalogColumns::default(), b',').unwrap_err();
        match err {
            ReconError::Schema { dataset, column } => {
                assert_eq!(dataset, Dataset::Catalog);
                assert_eq!(column, "Original Title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn streaming_uses_its_own_column_names() {
        let csv = "Title,OriginalTitle,Provider\nDer Pate,The Godfather,Netflix\n";
        let rows = load_streaming(csv, &StreamingColumns::default(), b',').unwrap();
        assert_eq!(
            rows,
            vec![StreamingRow { title: "Der Pate".into(), original_title: "The Godfather".into() }]
        );
    }

    #[test]
    fn streaming_with_catalog_header_names_is_schema_error() {
        let csv = "Title,Original Title\nA,B\n";
        let err = load_streaming(csv, &StreamingColumns::default(), b',').unwrap_err();
        assert!(matches!(
            err,
            ReconError::Schema { dataset: Dataset::Streaming, ref column } if column == "OriginalTitle"
        ));
    }

    #[test]
    fn ragged_row_is_load_error() {
        let csv = "Title,OriginalTitle\nA,B,C\n";
        let err = load_streaming(csv, &StreamingColumns::default(), b',').unwrap_err();
        assert!(matches!(err, ReconError::Load { dataset: Dataset::Streaming, .. }));
    }

    #[test]
    fn semicolon_delimiter() {
        let csv = "Title;OriginalTitle\nA;B\n";
        let rows = load_streaming(csv, &StreamingColumns::default(), b';').unwrap();
        assert_eq!(rows[0].original_title, "B");
    }
}
