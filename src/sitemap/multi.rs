use crate::progress::ProgressObserver;
use crate::sitemap::{ResolutionResult, SitemapResolver};
use crate::source::SourceLocation;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolves several independent root sitemaps
///
/// Roots are resolved concurrently up to a fixed limit. Results always come
/// back in input order, whatever order the roots finish in.
#[derive(Debug, Clone)]
pub struct MultiSourceResolver {
    resolver: SitemapResolver,
    concurrency: usize,
}

impl MultiSourceResolver {
    pub fn new(resolver: SitemapResolver, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// Resolves every root, one result per root in input order
    ///
    /// `progress` is told after each root finishes (in completion order),
    /// labelled with that root. Roots that produce no URLs are kept so their
    /// errors stay visible.
    pub async fn resolve_all(
        &self,
        roots: &[SourceLocation],
        progress: &dyn ProgressObserver,
    ) -> Vec<ResolutionResult> {
        let total = roots.len();
        let completed = AtomicUsize::new(0);
        let resolver = &self.resolver;

        let mut tagged: Vec<(usize, ResolutionResult)> = stream::iter(roots.iter().enumerate())
            .map(|(index, root)| async move { (index, resolver.resolve(root).await) })
            .buffer_unordered(self.concurrency)
            .inspect(|(_, result)| {
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!("Sources resolved: {}/{}", done, total);
                progress.on_progress(done, total, &result.root.label());
            })
            .collect()
            .await;

        tagged.sort_by_key(|(index, _)| *index);
        tagged.into_iter().map(|(_, result)| result).collect()
    }
}
