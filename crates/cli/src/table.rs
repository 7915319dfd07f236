//! Plain-text rendering of the result set.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use streamgap_recon::export::{cell, display_columns, format_cell};
use streamgap_recon::ConfirmedMissingRow;

const MAX_CELL_WIDTH: usize = 48;

/// Cut `s` to at most `max` columns, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Render the display columns of `rows` as an aligned table.
pub fn render(headers: &[String], rows: &[ConfirmedMissingRow]) -> String {
    let columns = display_columns(headers);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&format_cell(c, cell(headers, row, c)), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(c.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| -> String {
        let padded: Vec<String> =
            values.iter().zip(&widths).map(|(v, w)| pad(v, *w)).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&columns));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamgap_recon::{CandidateRow, CatalogRow, MissingBasis};

    fn row(fields: &[&str], imdb_id: &str) -> ConfirmedMissingRow {
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
    fn truncate_marks_cut() {
        assert_eq!(truncate("Stalker", 10), "Stalker");
        assert_eq!(truncate("2001: A Space Odyssey", 8), "2001: A…");
    }

    #[test]
    fn aligned_columns() {
        let headers: Vec<String> = ["Title", "Original Title", "Year", "Const"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            row(&["Stalker", "Сталкер", "1979.0", "x"], "tt0079944"),
            row(&["Home Movie", "Home Movie", "", "y"], ""),
        ];
        let text = render(&headers, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "IMDB ID    Title       Original Title  Year");
        assert_eq!(lines[1], "---------  ----------  --------------  ----");
        assert_eq!(lines[2], "tt0079944  Stalker     Сталкер         1979");
        assert_eq!(lines[3], "           Home Movie  Home Movie");
    }
}
