pub mod error;
pub mod handlers;
pub mod index;
pub mod markdown;
pub mod resolver;
pub mod slug;
pub mod source;
pub mod types;

pub use error::BlogError;
pub use index::PostIndex;
pub use resolver::PostResolver;
pub use slug::extract_slug;
pub use source::{ContentSource, DirectorySource, MemorySource};
pub use types::*;

use std::sync::Arc;

/// The blog section: configuration plus the index and resolver sharing one
/// content source.
#[derive(Clone)]
pub struct Blog {
    config: BlogConfig,
    index: PostIndex,
    resolver: PostResolver,
}

impl Blog {
    pub fn new(config: BlogConfig) -> Self {
        let source = DirectorySource::new(config.source_directory.clone()).recursive(config.recursive);
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: BlogConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            config,
            index: PostIndex::new(source.clone()),
            resolver: PostResolver::new(source),
        }
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    pub fn index(&self) -> &PostIndex {
        &self.index
    }

    pub async fn listing(&self) -> Result<Listing, BlogError> {
        self.index.listing(self.config.sort).await
    }

    pub async fn resolve(&self, slug: &str) -> Result<ResolvedPost, BlogError> {
        self.resolver.resolve(slug).await
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/{}", self.config.route_prefix().unwrap_or_default(), slug)
    }
}
