use super::{error::BlogError, slug::extract_slug, source::ContentSource, types::*};
use std::{cmp::Ordering, sync::Arc};
use tracing::{debug, error, info, warn};

/// Builds post listings from a content source.
#[derive(Clone)]
pub struct PostIndex {
    source: Arc<dyn ContentSource>,
}

impl PostIndex {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Every source path that yields a slug, in enumeration order, plus the
    /// paths that did not.
    pub async fn references(&self) -> Result<(Vec<PostReference>, Vec<String>), BlogError> {
        enumerate(&self.source).await
    }

    /// Slugs only, without loading any post content.
    pub async fn slugs(&self) -> Result<Vec<String>, BlogError> {
        let (references, _) = self.references().await?;
        Ok(references.into_iter().map(|r| r.slug).collect())
    }

    pub async fn listing(&self, policy: SortPolicy) -> Result<Listing, BlogError> {
        let (references, skipped_paths) = self.references().await?;
        let mut report = IndexReport {
            skipped_paths,
            failed_paths: Vec::new(),
        };

        let mut entries = Vec::with_capacity(references.len());
        for reference in references {
            match reference.load().await {
                Ok(Some(content)) => entries.push(PostListingEntry {
                    slug: reference.slug,
                    date: content.metadata.date,
                    title: content.metadata.title,
                }),
                Ok(None) => {
                    warn!("Post source produced no content: {}", reference.source_path);
                    report.failed_paths.push(reference.source_path);
                }
                Err(e) => {
                    error!("Failed to load post {}: {}", reference.source_path, e);
                    report.failed_paths.push(reference.source_path);
                }
            }
        }

        if policy == SortPolicy::DateAscending {
            sort_by_date(&mut entries);
        }

        info!(
            "Built listing with {} posts ({} data-quality gaps)",
            entries.len(),
            report.gap_count()
        );

        Ok(Listing { entries, report })
    }
}

pub(crate) async fn enumerate(
    source: &Arc<dyn ContentSource>,
) -> Result<(Vec<PostReference>, Vec<String>), BlogError> {
    let mut references = Vec::new();
    let mut skipped = Vec::new();

    for path in source.list_paths().await? {
        match extract_slug(&path) {
            Some(slug) => {
                debug!("Found post {} at {}", slug, path);
                references.push(PostReference::new(slug.to_string(), path, source.clone()));
            }
            None => {
                warn!("Skipping post source without a slug: {}", path);
                skipped.push(path);
            }
        }
    }

    Ok((references, skipped))
}

/// Stable ascending sort by parsed date; unparseable dates go last.
pub fn sort_by_date(entries: &mut [PostListingEntry]) {
    entries.sort_by(compare_dates);
}

fn compare_dates(a: &PostListingEntry, b: &PostListingEntry) -> Ordering {
    match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
