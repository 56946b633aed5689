use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod blog;
pub mod startup_checks;
pub mod static_files;
pub mod templating;
pub mod theme;

pub use blog::BlogConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub templates: TemplateConfig,
    pub static_files: StaticConfig,
    #[serde(default)]
    pub blog: BlogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticConfig {
    pub directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "Lantern".to_string(),
                log_level: "info".to_string(),
                base_url: None,
            },
            templates: TemplateConfig {
                directory: PathBuf::from("templates"),
            },
            static_files: StaticConfig {
                directory: PathBuf::from("static"),
            },
            blog: BlogConfig::default(),
        }
    }
}

use axum::{
    Router,
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub template_engine: Arc<templating::TemplateEngine>,
    pub static_handler: static_files::StaticFileHandler,
    pub blog: blog::Blog,
    pub config: Config,
}

async fn static_file_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    app_state.static_handler.serve(&path).await
}

pub async fn create_app(config: Config) -> Router {
    let blog = blog::Blog::new(config.blog.clone());
    create_app_with_blog(config, blog)
}

/// Builds the router around an already constructed blog, which lets callers
/// supply their own content source.
pub fn create_app_with_blog(config: Config, blog: blog::Blog) -> Router {
    let template_engine = Arc::new(templating::TemplateEngine::new(
        config.templates.directory.clone(),
        config.app.name.clone(),
    ));

    let static_handler =
        static_files::StaticFileHandler::new(config.static_files.directory.clone());

    let blog_prefix = blog.config().route_prefix();

    let app_state = AppState {
        template_engine,
        static_handler,
        blog,
        config,
    };

    let mut router = Router::new()
        .route(
            "/",
            get(templating::page_handler).post(theme::set_theme_handler),
        )
        .route("/theme", post(theme::set_theme_handler));

    match blog_prefix {
        Some(prefix) => {
            router = router
                .route(&prefix, get(blog::handlers::blog_index_handler))
                .route(
                    &format!("{}/{{slug}}", prefix),
                    get(blog::handlers::blog_post_handler),
                );
        }
        None => tracing::error!(
            "Blog url_prefix {:?} names the site root; blog pages are disabled",
            app_state.blog.config().url_prefix
        ),
    }

    router
        .route("/api/blog", get(blog::handlers::blog_api_handler))
        .route("/static/{*path}", get(static_file_handler))
        .route("/{*path}", get(templating::page_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &axum::http::Request<_>| {
                            let method = request.method();
                            let uri = request.uri();
                            let matched_path = request
                                .extensions()
                                .get::<axum::extract::MatchedPath>()
                                .map(|matched_path| matched_path.as_str());

                            tracing::info_span!(
                                "http_request",
                                method = %method,
                                uri = %uri,
                                matched_path,
                            )
                        })
                        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                            let headers = request.headers();
                            let user_agent = headers
                                .get("user-agent")
                                .and_then(|h| h.to_str().ok())
                                .unwrap_or("-");
                            let referer = headers
                                .get("referer")
                                .and_then(|h| h.to_str().ok())
                                .unwrap_or("-");

                            tracing::info!(
                                target: "access_log",
                                method = %request.method(),
                                path = %request.uri().path(),
                                query = ?request.uri().query(),
                                user_agent = %user_agent,
                                referer = %referer,
                                "request"
                            );
                        })
                        .on_response(
                            |response: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             _span: &tracing::Span| {
                                tracing::info!(
                                    target: "access_log",
                                    status = %response.status(),
                                    latency_ms = %latency.as_millis(),
                                    "response"
                                );
                            },
                        ),
                )
                .layer(middleware::from_fn(theme::inject_theme)),
        )
        .with_state(app_state)
}
