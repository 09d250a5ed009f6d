use crate::source::{SourceKind, SourceLocation};
use crate::SourceError;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// How long a reachability probe may take before the source is rejected
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Checks that a source can be handed to the resolver
///
/// # Rules
///
/// | Kind | Accepted when |
/// |------|---------------|
/// | Remote | The URL parses and a HEAD request completes within [`PROBE_TIMEOUT`] |
/// | Local | The path exists and has an `.xml` extension |
///
/// The HEAD probe only rejects transport failures; any HTTP status is
/// accepted since some servers refuse HEAD but serve GET.
pub async fn validate_source(client: &Client, location: &SourceLocation) -> Result<(), SourceError> {
    if location.as_str().is_empty() {
        return Err(SourceError::Empty);
    }

    match location.kind() {
        SourceKind::Remote => {
            Url::parse(location.as_str()).map_err(|e| SourceError::InvalidUrl {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

            client
                .head(location.as_str())
                .timeout(PROBE_TIMEOUT)
                .send()
                .await
                .map_err(|e| SourceError::Unreachable {
                    location: location.to_string(),
                    reason: e.to_string(),
                })?;

            Ok(())
        }
        SourceKind::Local => validate_local_path(Path::new(location.as_str())),
    }
}

fn validate_local_path(path: &Path) -> Result<(), SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.display().to_string()));
    }

    let is_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if !is_xml {
        return Err(SourceError::NotXml(path.display().to_string()));
    }

    Ok(())
}
