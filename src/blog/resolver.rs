use super::{error::BlogError, index::enumerate, source::ContentSource, types::ResolvedPost};
use std::sync::Arc;
use tracing::{debug, trace};

/// Looks up a single post by slug.
#[derive(Clone)]
pub struct PostResolver {
    source: Arc<dyn ContentSource>,
}

impl PostResolver {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Scans the source in enumeration order and loads the first post whose
    /// slug matches. Nothing is cached; every call hits the source.
    pub async fn resolve(&self, slug: &str) -> Result<ResolvedPost, BlogError> {
        let (references, _) = enumerate(&self.source).await?;

        let reference = references
            .into_iter()
            .inspect(|r| trace!("Checking {} for slug {}", r.source_path, slug))
            .find(|r| r.slug == slug)
            .ok_or_else(|| BlogError::NotFound(slug.to_string()))?;

        debug!("Resolved slug {} to {}", slug, reference.source_path);

        let content = reference
            .load()
            .await?
            .ok_or_else(|| BlogError::NotFound(slug.to_string()))?;

        Ok(ResolvedPost {
            slug: reference.slug,
            metadata: content.metadata,
            html_body: content.html_body,
        })
    }
}
