use crate::Config;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Template directory does not exist: {0}")]
    TemplateDirectoryMissing(String),

    #[error("Static files directory does not exist: {0}")]
    StaticDirectoryMissing(String),

    #[error("Blog source directory does not exist: {0}")]
    BlogDirectoryMissing(String),

    #[error("Required template missing: {0}")]
    RequiredTemplateMissing(String),

    #[error("Blog url_prefix must not be the site root: {0:?}")]
    InvalidBlogPrefix(String),
}

impl StartupCheckError {
    /// Critical failures stop the server from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::TemplateDirectoryMissing(_) | StartupCheckError::InvalidBlogPrefix(_)
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let templates_dir = &config.templates.directory;
    if templates_dir.is_dir() {
        info!("Template directory exists: {:?}", templates_dir);

        for template in [
            "pages/index.html.liquid",
            config.blog.index_template.as_str(),
            config.blog.post_template.as_str(),
        ] {
            if !templates_dir.join(template).is_file() {
                warn!("Required template missing: {}", template);
                errors.push(StartupCheckError::RequiredTemplateMissing(
                    template.to_string(),
                ));
            }
        }
    } else {
        errors.push(StartupCheckError::TemplateDirectoryMissing(
            templates_dir.display().to_string(),
        ));
    }

    let static_dir = &config.static_files.directory;
    if static_dir.is_dir() {
        info!("Static files directory exists: {:?}", static_dir);
    } else {
        warn!("Static files directory does not exist: {:?}", static_dir);
        errors.push(StartupCheckError::StaticDirectoryMissing(
            static_dir.display().to_string(),
        ));
    }

    let blog_dir = &config.blog.source_directory;
    if blog_dir.is_dir() {
        info!("Blog source directory exists: {:?}", blog_dir);
    } else {
        warn!("Blog source directory does not exist: {:?}", blog_dir);
        errors.push(StartupCheckError::BlogDirectoryMissing(
            blog_dir.display().to_string(),
        ));
    }

    if config.blog.route_prefix().is_none() {
        errors.push(StartupCheckError::InvalidBlogPrefix(
            config.blog.url_prefix.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
