use super::{error::BlogError, markdown::parse_document, types::PostContent};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Where posts come from: a listing of source paths plus a lazy loader per path.
///
/// Implementations are read-only and shared across requests.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_paths(&self) -> Result<Vec<String>, BlogError>;

    /// Loads the post stored at `path`. `Ok(None)` means there is nothing to
    /// render there.
    async fn load(&self, path: &str) -> Result<Option<PostContent>, BlogError>;
}

/// Markdown files in a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    recursive: bool,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn is_post_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("svx"))
            .unwrap_or(false)
    }

    fn scan(&self) -> Result<Vec<String>, BlogError> {
        if !self.root.is_dir() {
            warn!("Post directory does not exist: {:?}", self.root);
            return Ok(Vec::new());
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => BlogError::IoError(io),
                None => BlogError::InvalidFormat("Filesystem loop in post directory".to_string()),
            })?;

            if entry.file_type().is_file() && Self::is_post_file(entry.path()) {
                match entry.path().to_str() {
                    Some(path) => paths.push(path.replace('\\', "/")),
                    None => debug!("Ignoring non UTF-8 path {:?}", entry.path()),
                }
            }
        }

        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl ContentSource for DirectorySource {
    async fn list_paths(&self) -> Result<Vec<String>, BlogError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.scan())
            .await
            .map_err(|e| BlogError::InvalidFormat(format!("Directory scan panicked: {}", e)))?
    }

    async fn load(&self, path: &str) -> Result<Option<PostContent>, BlogError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Post source vanished: {}", path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            trace!("Post source is empty: {}", path);
            return Ok(None);
        }

        parse_document(&content).map(Some)
    }
}

/// Posts held in memory, enumerated in insertion order.
#[derive(Default)]
pub struct MemorySource {
    entries: Vec<(String, Option<PostContent>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: Option<PostContent>) {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((path, content)),
        }
    }

    /// Builds a source from `(path, markdown document)` pairs.
    pub fn from_documents<I, P, D>(documents: I) -> Result<Self, BlogError>
    where
        I: IntoIterator<Item = (P, D)>,
        P: Into<String>,
        D: AsRef<str>,
    {
        let mut source = Self::new();
        for (path, document) in documents {
            source.insert(path, Some(parse_document(document.as_ref())?));
        }
        Ok(source)
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn list_paths(&self) -> Result<Vec<String>, BlogError> {
        Ok(self.entries.iter().map(|(path, _)| path.clone()).collect())
    }

    async fn load(&self, path: &str) -> Result<Option<PostContent>, BlogError> {
        Ok(self
            .entries
            .iter()
            .find(|(p, _)| p == path)
            .and_then(|(_, content)| content.clone()))
    }
}
