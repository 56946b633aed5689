use super::{error::BlogError, source::ContentSource};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::PathBuf, sync::Arc};

/// Front matter of a post. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PostMetadata {
    /// Human readable date, or the raw value when it does not parse.
    pub fn date_formatted(&self) -> String {
        format_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostContent {
    pub metadata: PostMetadata,
    pub html_body: String,
}

/// Lazy handle to a post: the slug and source path are known, the content is
/// only read when [`PostReference::load`] is awaited.
#[derive(Clone)]
pub struct PostReference {
    pub slug: String,
    pub source_path: String,
    source: Arc<dyn ContentSource>,
}

impl PostReference {
    pub fn new(slug: String, source_path: String, source: Arc<dyn ContentSource>) -> Self {
        Self {
            slug,
            source_path,
            source,
        }
    }

    pub async fn load(&self) -> Result<Option<PostContent>, BlogError> {
        self.source.load(&self.source_path).await
    }
}

impl fmt::Debug for PostReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostReference")
            .field("slug", &self.slug)
            .field("source_path", &self.source_path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListingEntry {
    pub slug: String,
    pub date: String,
    pub title: String,
}

/// Data-quality gaps found while building a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Source paths that did not yield a slug.
    pub skipped_paths: Vec<String>,
    /// Source paths whose loader failed or produced nothing.
    pub failed_paths: Vec<String>,
}

impl IndexReport {
    pub fn gap_count(&self) -> usize {
        self.skipped_paths.len() + self.failed_paths.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<PostListingEntry>,
    pub report: IndexReport,
}

#[derive(Debug, Clone)]
pub struct ResolvedPost {
    pub slug: String,
    pub metadata: PostMetadata,
    pub html_body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Ascending by parsed date; undated entries last, in enumeration order.
    #[default]
    DateAscending,
    /// Enumeration order of the content source.
    Insertion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    #[serde(default = "default_source_directory")]
    pub source_directory: PathBuf,
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "default_index_template")]
    pub index_template: String,
    #[serde(default = "default_post_template")]
    pub post_template: String,
    #[serde(default)]
    pub sort: SortPolicy,
    #[serde(default)]
    pub recursive: bool,
}

fn default_source_directory() -> PathBuf {
    PathBuf::from("blogposts")
}

fn default_url_prefix() -> String {
    String::from("/blog")
}

fn default_index_template() -> String {
    String::from("pages/blog_index.html.liquid")
}

fn default_post_template() -> String {
    String::from("pages/blog_post.html.liquid")
}

impl BlogConfig {
    /// The URL prefix as a route path (`writing/` becomes `/writing`), or
    /// `None` when it names the site root, which belongs to the page routes.
    pub fn route_prefix(&self) -> Option<String> {
        let trimmed = self.url_prefix.trim().trim_matches('/');
        (!trimmed.is_empty()).then(|| format!("/{}", trimmed))
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            source_directory: default_source_directory(),
            url_prefix: default_url_prefix(),
            index_template: default_index_template(),
            post_template: default_post_template(),
            sort: SortPolicy::default(),
            recursive: false,
        }
    }
}

pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(date_str) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        return Some(date.and_utc());
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// `January 2, 2024` style date, or the input unchanged when it does not parse.
pub fn format_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => date_str.to_string(),
    }
}
