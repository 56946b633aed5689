use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{
    path::{Component, Path, PathBuf},
    time::UNIX_EPOCH,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct StaticFileHandler {
    pub static_dir: PathBuf,
}

impl StaticFileHandler {
    pub fn new(static_dir: PathBuf) -> Self {
        Self { static_dir }
    }

    /// Joins a request path onto the static directory, refusing anything that
    /// could climb out of it.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            Some(self.static_dir.join(relative))
        } else {
            None
        }
    }

    pub async fn serve(&self, path: &str) -> Response {
        let Some(file_path) = self.resolve(path) else {
            warn!("Path traversal attempt: {:?}", path);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        };

        debug!("Attempting to serve static file: {:?}", file_path);

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return (StatusCode::NOT_FOUND, "File not found").into_response(),
            Err(e) => {
                debug!("Failed to get metadata for {:?}: {}", file_path, e);
                return (StatusCode::NOT_FOUND, "File not found").into_response();
            }
        };

        let file = match File::open(&file_path).await {
            Ok(file) => file,
            Err(e) => {
                debug!("Failed to open file {:?}: {}", file_path, e);
                return (StatusCode::NOT_FOUND, "File not found").into_response();
            }
        };

        let content_type = mime_guess::from_path(&file_path)
            .first_or_octet_stream()
            .to_string();

        let cache_control = if content_type.starts_with("image/") {
            "public, max-age=31536000"
        } else if content_type.starts_with("text/css")
            || content_type.starts_with("application/javascript")
            || content_type.starts_with("text/javascript")
        {
            "public, max-age=300, must-revalidate"
        } else {
            "public, max-age=3600"
        };

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, cache_control)
            .header(header::CONTENT_LENGTH, metadata.len());

        if let Ok(modified) = metadata.modified()
            && let Ok(duration) = modified.duration_since(UNIX_EPOCH)
        {
            response = response.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
            let etag = format!("\"{}-{}\"", duration.as_secs(), metadata.len());
            response = response.header(header::ETAG, etag);
        }

        match response.body(Body::from_stream(ReaderStream::new(file))) {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to build static file response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serves_file_with_headers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("style.css"), "body { color: red; }").unwrap();

        let handler = StaticFileHandler::new(temp_dir.path().to_path_buf());
        let response = handler.serve("style.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=300, must-revalidate"
        );
        assert!(response.headers().contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let handler = StaticFileHandler::new(temp_dir.path().join("static"));

        let response = handler.serve("../secret.txt").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let handler = StaticFileHandler::new(temp_dir.path().to_path_buf());

        let response = handler.serve("nope.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
