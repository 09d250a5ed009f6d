use crate::crawler::Fetcher;
use crate::sitemap::parser::parse_sitemap;
use crate::sitemap::{ErrorKind, NodeError, ResolutionResult, SitemapNode};
use crate::source::SourceLocation;
use futures::future::BoxFuture;
use std::time::Duration;

/// Flattens one root sitemap into its page URLs
///
/// Resolution is depth-first and sequential within a root, so the URL order
/// always follows document order: children of an index are resolved in the
/// order they are listed and their URLs are concatenated.
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    fetcher: Fetcher,
    timeout: Duration,
    max_depth: u32,
}

impl SitemapResolver {
    /// Creates a resolver
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves each sitemap document
    /// * `timeout` - Bound on every single document fetch
    /// * `max_depth` - Deepest index nesting followed below the root
    pub fn new(fetcher: Fetcher, timeout: Duration, max_depth: u32) -> Self {
        Self {
            fetcher,
            timeout,
            max_depth,
        }
    }

    /// Resolves `root` into a flat URL list
    ///
    /// This never fails. Every node that cannot be fetched or parsed adds
    /// exactly one entry to `errors` and no URLs; its siblings are still
    /// resolved. An empty root document is reported as "no URLs found",
    /// while an empty nested sitemap contributes nothing.
    ///
    /// An index child that is already being resolved higher up the chain
    /// (a cycle) or that lies deeper than `max_depth` is not fetched and is
    /// recorded as an error instead.
    pub async fn resolve(&self, root: &SourceLocation) -> ResolutionResult {
        tracing::info!("Resolving sitemap: {}", root);

        let mut result = ResolutionResult::new(root.clone());
        let mut ancestors = Vec::new();
        self.resolve_node(root, 0, &mut ancestors, &mut result).await;

        tracing::info!(
            "Resolved {}: {} URLs, {} errors",
            root,
            result.urls.len(),
            result.errors.len()
        );
        result
    }

    fn resolve_node<'a>(
        &'a self,
        location: &'a SourceLocation,
        depth: u32,
        ancestors: &'a mut Vec<SourceLocation>,
        result: &'a mut ResolutionResult,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let bytes = match self.fetcher.fetch(location, self.timeout).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Failed to fetch sitemap {}: {}", location, e);
                    result
                        .errors
                        .push(NodeError::new(location.clone(), ErrorKind::Fetch, e.to_string()));
                    return;
                }
            };

            let node = match parse_sitemap(&bytes) {
                Ok(node) => node,
                Err(e) => {
                    tracing::warn!("Failed to parse sitemap {}: {}", location, e);
                    result
                        .errors
                        .push(NodeError::new(location.clone(), ErrorKind::Parse, e.to_string()));
                    return;
                }
            };

            match node {
                SitemapNode::Leaf { urls } => {
                    tracing::debug!("Leaf sitemap {} lists {} URLs", location, urls.len());
                    result.urls.extend(urls);
                }
                SitemapNode::Empty if depth == 0 => {
                    tracing::warn!("No URLs found in {}", location);
                    result.errors.push(NodeError::new(
                        location.clone(),
                        ErrorKind::NoUrlsFound,
                        "no URLs found",
                    ));
                }
                SitemapNode::Empty => {
                    tracing::debug!("Nested sitemap {} is empty", location);
                }
                SitemapNode::Index { children } => {
                    tracing::debug!(
                        "Sitemap index {} lists {} children (depth {})",
                        location,
                        children.len(),
                        depth
                    );

                    ancestors.push(location.clone());
                    for raw_child in &children {
                        let child = match location.join(raw_child.as_str()) {
                            Ok(child) => child,
                            Err(e) => {
                                tracing::warn!("Skipping child of {}: {}", location, e);
                                result.errors.push(NodeError::new(
                                    raw_child.clone(),
                                    ErrorKind::InvalidLocation,
                                    e.to_string(),
                                ));
                                continue;
                            }
                        };

                        if ancestors.contains(&child) {
                            tracing::warn!("Sitemap index cycle at {}", child);
                            result.errors.push(NodeError::new(
                                child,
                                ErrorKind::Cycle,
                                "sitemap index refers back to one of its ancestors",
                            ));
                            continue;
                        }

                        if depth + 1 > self.max_depth {
                            tracing::warn!("Skipping {}: index nesting too deep", child);
                            result.errors.push(NodeError::new(
                                child,
                                ErrorKind::DepthExceeded,
                                format!("sitemap index nesting exceeds {} levels", self.max_depth),
                            ));
                            continue;
                        }

                        self.resolve_node(&child, depth + 1, ancestors, result).await;
                    }
                    ancestors.pop();
                }
            }
        })
    }
}
