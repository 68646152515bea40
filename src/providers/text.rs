//! Snippet cleanup shared by the providers

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markup and entities from a snippet and collapse whitespace
pub fn clean_snippet(raw: &str) -> String {
    let text: String = Html::parse_fragment(raw).root_element().text().collect();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snippet() {
        assert_eq!(
            clean_snippet("The <strong>Rust</strong> &amp; Cargo\n   book"),
            "The Rust & Cargo book"
        );
        assert_eq!(
            clean_snippet(r#"<span class="searchmatch">Rust</span> is a language"#),
            "Rust is a language"
        );
    }
}
