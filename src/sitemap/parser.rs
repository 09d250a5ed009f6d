use crate::sitemap::SitemapNode;
use crate::source::SourceLocation;
use crate::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses a fetched sitemap document
///
/// # Classification
///
/// 1. Not well-formed XML (syntax error, mismatched or unclosed tags, no
///    root element) → `ParseError::Malformed`
/// 2. At least one `<sitemap><loc>` with text → `Index`
/// 3. Otherwise at least one `<url><loc>` with text → `Leaf`
/// 4. Otherwise → `Empty`
///
/// Element names are compared by local name, so namespace prefixes do not
/// matter. `<loc>` text is trimmed and blank values are skipped.
///
/// # Example
///
/// ```
/// use sitemap_harvest::sitemap::{parse_sitemap, SitemapNode};
///
/// let xml = br#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapNode::Leaf { urls: vec!["https://example.com/a".to_string()] }
/// );
/// ```
pub fn parse_sitemap(bytes: &[u8]) -> Result<SitemapNode, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();

    // Open elements by local name, outermost first
    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut loc_text: Option<String> = None;
    let mut index_locs = Vec::new();
    let mut url_locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if stack.is_empty() {
                    if saw_root {
                        return Err(ParseError::Malformed(format!(
                            "second root element <{}>",
                            name
                        )));
                    }
                    saw_root = true;
                }
                if name == "loc" {
                    loc_text = Some(String::new());
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    if saw_root {
                        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                        return Err(ParseError::Malformed(format!(
                            "second root element <{}/>",
                            name
                        )));
                    }
                    saw_root = true;
                }
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("end tag without matching start tag".to_string())
                })?;
                if name == "loc" {
                    if let Some(text) = loc_text.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            match stack.last().map(String::as_str) {
                                Some("sitemap") => index_locs.push(SourceLocation::new(text)),
                                Some("url") => url_locs.push(text.to_string()),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(text) = loc_text.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| ParseError::Malformed(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(text) = loc_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Malformed(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Malformed(format!("unclosed element <{}>", open)));
    }
    if !saw_root {
        return Err(ParseError::Malformed("document has no root element".to_string()));
    }

    if !index_locs.is_empty() {
        Ok(SitemapNode::Index {
            children: index_locs,
        })
    } else if !url_locs.is_empty() {
        Ok(SitemapNode::Leaf { urls: url_locs })
    } else {
        Ok(SitemapNode::Empty)
    }
}
