/// Characters that are illegal in file names on at least one common platform
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Upper bound on the stem length, leaving room for export suffixes
const MAX_STEM_BYTES: usize = 200;

/// Derives a filesystem-safe file stem from a source identifier
///
/// Every illegal or control character is replaced by `_`. The mapping is
/// deterministic, so the same source always exports to the same files.
///
/// # Examples
///
/// ```
/// use sitemap_harvest::source::export_stem;
///
/// assert_eq!(
///     export_stem("https://example.com/sitemap.xml"),
///     "https___example.com_sitemap.xml"
/// );
/// ```
pub fn export_stem(identifier: &str) -> String {
    let mut stem: String = identifier
        .trim()
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if stem.len() > MAX_STEM_BYTES {
        let mut cut = MAX_STEM_BYTES;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
    }

    if stem.is_empty() {
        return "source".to_string();
    }

    stem
}
