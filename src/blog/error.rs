use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Front matter error: {0}")]
    FrontMatter(String),

    #[error("Invalid post format: {0}")]
    InvalidFormat(String),

    #[error("Post not found: {0}")]
    NotFound(String),
}

impl From<toml_edit::de::Error> for BlogError {
    fn from(error: toml_edit::de::Error) -> Self {
        BlogError::FrontMatter(error.to_string())
    }
}

impl From<serde_yaml::Error> for BlogError {
    fn from(error: serde_yaml::Error) -> Self {
        BlogError::FrontMatter(error.to_string())
    }
}

impl BlogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let message = match self {
            BlogError::NotFound(_) => "Post not found",
            _ => "Failed to load post",
        };

        (self.status_code(), message).into_response()
    }
}
