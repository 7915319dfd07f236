use std::sync::OnceLock;

use regex::Regex;

fn imdb_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"tt\d+").expect("static pattern"))
}

/// First `tt` + digits run in `url`, or an empty string.
pub fn extract_imdb_id(url: Option<&str>) -> String {
    url.and_then(|u| imdb_id_pattern().find(u))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_url() {
        assert_eq!(extract_imdb_id(Some("https://imdb.com/title/tt1234567/")), "tt1234567");
    }

    #[test]
    fn no_id() {
        assert_eq!(extract_imdb_id(Some("no id here")), "");
        assert_eq!(extract_imdb_id(Some("")), "");
        assert_eq!(extract_imdb_id(None), "");
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(
            extract_imdb_id(Some("https://www.imdb.com/title/tt0111161/?ref_=tt0068646")),
            "tt0111161"
        );
    }

    #[test]
    fn tt_needs_digits() {
        assert_eq!(extract_imdb_id(Some("https://example.com/settings/tt/x")), "");
        assert_eq!(extract_imdb_id(Some("https://pretty42.example/")), "");
        // Not anchored to a word boundary.
        assert_eq!(extract_imdb_id(Some("mytt99")), "tt99");
    }
}
