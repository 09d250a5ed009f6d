//! HTML parser for page titles
//!
//! Pages fetched during enrichment are parsed with `scraper`, which is
//! forgiving of broken markup, so title extraction never fails: it either
//! finds a title or reports none.

use scraper::{Html, Selector};

/// Decodes a fetched page body as text
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn decode_html(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

/// Extracts the content of the first `<title>` element, trimmed
///
/// Returns `None` when there is no title element or its text is blank.
///
/// # Example
///
/// ```
/// use sitemap_harvest::crawler::extract_title;
///
/// let html = r#"<html><head><title> Test </title></head><body></body></html>"#;
/// assert_eq!(extract_title(html), Some("Test".to_string()));
/// ```
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
