use std::collections::HashSet;

use crate::model::{CatalogRow, StreamingRow};

/// Case-fold for comparison. Plain Unicode lowercase, no locale rules and
/// no punctuation or diacritic normalization.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Folded union of both title fields of the streaming table.
///
/// The two exports disagree on which field holds the localized title, so
/// either catalog title may show up in either streaming column.
#[derive(Debug, Default)]
pub struct TitleIndex {
    titles: HashSet<String>,
}

impl TitleIndex {
    pub fn build(rows: &[StreamingRow]) -> Self {
        let mut titles = HashSet::with_capacity(rows.len() * 2);
        for row in rows {
            for value in [&row.title, &row.original_title] {
                if !value.is_empty() {
                    titles.insert(fold(value));
                }
            }
        }
        Self { titles }
    }

    /// Empty strings never match.
    pub fn contains(&self, title: &str) -> bool {
        !title.is_empty() && self.titles.contains(&fold(title))
    }

    /// A catalog row is present when its title or its original title
    /// matches either streaming title field.
    pub fn is_present(&self, row: &CatalogRow) -> bool {
        self.contains(&row.title) || self.contains(&row.original_title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
