use crate::SourceError;
use std::fmt;
use std::path::Path;
use url::Url;

/// Scheme prefixes that mark a location as remote
const REMOTE_SCHEMES: &[&str] = &["http://", "https://"];

/// Where a source location points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A path on the local filesystem
    Local,
    /// An HTTP(S) address
    Remote,
}

/// A sitemap or page location, tagged as local or remote
///
/// The tag is decided once, syntactically, from the scheme prefix:
/// anything starting with `http://` or `https://` (any case) is remote,
/// everything else is treated as a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    raw: String,
    kind: SourceKind,
}

impl SourceLocation {
    /// Creates a location from a raw string, trimming surrounding whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_harvest::source::{SourceKind, SourceLocation};
    ///
    /// let remote = SourceLocation::new("https://example.com/sitemap.xml");
    /// assert_eq!(remote.kind(), SourceKind::Remote);
    ///
    /// let local = SourceLocation::new("./sitemap.xml");
    /// assert_eq!(local.kind(), SourceKind::Local);
    /// ```
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let kind = classify_location(&raw);
        Self { raw, kind }
    }

    /// Returns the location string as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn is_remote(&self) -> bool {
        self.kind == SourceKind::Remote
    }

    /// Resolves a child location listed inside the document at `self`
    ///
    /// Absolute children (scheme-prefixed URLs or absolute paths) are kept
    /// verbatim. Relative children of a remote parent are resolved as URL
    /// references; relative children of a local parent are resolved against
    /// the parent file's directory.
    ///
    /// A remote parent only ever yields remote children. A reference that
    /// does not join, or that joins to a non-HTTP(S) scheme such as a drive
    /// letter, is rejected with [`SourceError::InvalidUrl`].
    pub fn join(&self, child: &str) -> Result<SourceLocation, SourceError> {
        let child = child.trim();

        if has_remote_scheme(child) {
            return Ok(SourceLocation::new(child));
        }

        match self.kind {
            SourceKind::Remote => {
                let joined = Url::parse(&self.raw)
                    .and_then(|base| base.join(child))
                    .map_err(|e| SourceError::InvalidUrl {
                        location: child.to_string(),
                        reason: e.to_string(),
                    })?;

                if !matches!(joined.scheme(), "http" | "https") {
                    return Err(SourceError::InvalidUrl {
                        location: child.to_string(),
                        reason: format!("scheme {:?} is not http(s)", joined.scheme()),
                    });
                }
                Ok(SourceLocation::new(joined.to_string()))
            }
            SourceKind::Local => {
                let child_path = Path::new(child);
                if child_path.is_absolute() {
                    return Ok(SourceLocation::new(child));
                }
                let joined = match Path::new(&self.raw).parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => {
                        SourceLocation::new(dir.join(child_path).to_string_lossy().into_owned())
                    }
                    _ => SourceLocation::new(child),
                };
                Ok(joined)
            }
        }
    }

    /// Returns a short label for progress display
    ///
    /// For remote locations this is the last non-empty path segment (or the
    /// host for bare domains); for local ones the file name.
    pub fn label(&self) -> String {
        match self.kind {
            SourceKind::Remote => Url::parse(&self.raw)
                .ok()
                .and_then(|url| {
                    let segment = url
                        .path_segments()
                        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                        .map(str::to_string);
                    segment.or_else(|| url.host_str().map(str::to_string))
                })
                .unwrap_or_else(|| self.raw.clone()),
            SourceKind::Local => Path::new(&self.raw)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.raw.clone()),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for SourceLocation {
    fn from(raw: &str) -> Self {
        SourceLocation::new(raw)
    }
}

impl From<String> for SourceLocation {
    fn from(raw: String) -> Self {
        SourceLocation::new(raw)
    }
}

/// Tags a raw location string by its scheme prefix
pub fn classify_location(raw: &str) -> SourceKind {
    if has_remote_scheme(raw) {
        SourceKind::Remote
    } else {
        SourceKind::Local
    }
}

fn has_remote_scheme(raw: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|scheme| {
        raw.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
