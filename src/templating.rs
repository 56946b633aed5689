use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Datelike;
use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc, time::SystemTime};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

type Partials = liquid::partials::EagerCompiler<liquid::partials::InMemorySource>;

const PARTIALS_DIRECTORY: &str = "partials";
const PAGES_DIRECTORY: &str = "pages";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse template {0}: {1}")]
    Parse(String, String),

    #[error("Failed to render template {0}: {1}")]
    Render(String, String),
}

impl IntoResponse for TemplateError {
    fn into_response(self) -> Response {
        match self {
            TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "Page not found").into_response(),
            e => {
                error!("Template rendering error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub struct TemplateEngine {
    template_dir: PathBuf,
    site_name: String,
    cache: Arc<RwLock<HashMap<PathBuf, CachedTemplate>>>,
}

struct CachedTemplate {
    content: String,
    modified: SystemTime,
}

impl TemplateEngine {
    pub fn new(template_dir: PathBuf, site_name: String) -> Self {
        Self {
            template_dir,
            site_name,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn load_file(&self, template_path: PathBuf, name: &str) -> Result<String, TemplateError> {
        let metadata = match tokio::fs::metadata(&template_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let modified = metadata.modified()?;

        if let Some(cached) = self.cache.read().await.get(&template_path)
            && cached.modified >= modified
        {
            debug!("Using cached template for {}", name);
            return Ok(cached.content.clone());
        }

        info!("Loading template: {}", name);
        let content = tokio::fs::read_to_string(&template_path).await?;

        self.cache.write().await.insert(
            template_path,
            CachedTemplate {
                content: content.clone(),
                modified,
            },
        );

        Ok(content)
    }

    async fn load_template(&self, name: &str) -> Result<String, TemplateError> {
        self.load_file(self.template_dir.join(name), name).await
    }

    async fn load_partials(&self) -> Result<Partials, TemplateError> {
        let mut partials = Partials::empty();
        let partials_dir = self.template_dir.join(PARTIALS_DIRECTORY);

        let mut entries = match tokio::fs::read_dir(&partials_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No partials directory at {:?}", partials_dir);
                return Ok(partials);
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file()
                && let Some(file_name) = path.file_name().and_then(|n| n.to_str())
            {
                let file_name = file_name.to_string();
                let content = self.load_file(path, &file_name).await?;
                partials.add(file_name, content);
            }
        }

        Ok(partials)
    }

    /// Renders `template_name` (relative to the template directory) with the
    /// given globals plus `site_name` and `current_year`. Partials from
    /// `partials/` are available to `{% include %}`.
    pub async fn render_template(
        &self,
        template_name: &str,
        globals: liquid::Object,
    ) -> Result<String, TemplateError> {
        let template_content = self.load_template(template_name).await?;
        let partials = self.load_partials().await?;

        let parser = liquid::ParserBuilder::with_stdlib()
            .partials(partials)
            .build()
            .map_err(|e| TemplateError::Parse(template_name.to_string(), e.to_string()))?;

        let template = parser
            .parse(&template_content)
            .map_err(|e| TemplateError::Parse(template_name.to_string(), e.to_string()))?;

        let mut full_globals = liquid::object!({
            "site_name": self.site_name.clone(),
            "current_year": chrono::Utc::now().year(),
        });
        // Pages may set their own title with `assign`.
        full_globals.insert("page_title".into(), liquid::model::Value::Nil);
        full_globals.extend(globals);

        template
            .render(&full_globals)
            .map_err(|e| TemplateError::Render(template_name.to_string(), e.to_string()))
    }

    /// Renders the page template for a request path: `/` maps to
    /// `pages/index.html.liquid`, `/about` to `pages/about.html.liquid`.
    pub async fn render_page(&self, path: &str) -> Result<Html<String>, TemplateError> {
        let path = path.trim_matches('/');
        if path.split('/').any(|segment| segment == ".." || segment.starts_with('.')) {
            return Err(TemplateError::NotFound(path.to_string()));
        }

        let template_name = if path.is_empty() {
            format!("{}/index.html.liquid", PAGES_DIRECTORY)
        } else {
            format!("{}/{}.html.liquid", PAGES_DIRECTORY, path)
        };

        let globals = liquid::object!({
            "page_path": format!("/{}", path),
        });

        self.render_template(&template_name, globals).await.map(Html)
    }
}

pub async fn page_handler(
    State(app_state): State<AppState>,
    path: Option<Path<String>>,
) -> impl IntoResponse {
    let path = path.map(|p| p.0).unwrap_or_default();
    app_state.template_engine.render_page(&path).await
}
