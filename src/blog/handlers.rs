use super::types::{PostListingEntry, format_date};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct BlogListingResponse {
    pub posts: Vec<PostListingEntry>,
    pub skipped: usize,
}

pub async fn blog_index_handler(State(app_state): State<AppState>) -> Response {
    let blog = &app_state.blog;

    let listing = match blog.listing().await {
        Ok(listing) => listing,
        Err(e) => {
            error!("Failed to build blog listing: {}", e);
            return e.into_response();
        }
    };

    let posts: Vec<_> = listing
        .entries
        .iter()
        .map(|entry| {
            let title = display_title(&entry.title, &entry.slug);
            liquid::object!({
                "slug": entry.slug,
                "title": title,
                "date": entry.date,
                "date_formatted": format_date(&entry.date),
                "url": blog.post_url(&entry.slug),
            })
        })
        .collect();

    let globals = liquid::object!({
        "posts": posts,
        "url_prefix": blog.config().route_prefix().unwrap_or_default(),
        "page_title": "Blog",
        "skipped_count": listing.report.gap_count(),
    });

    match app_state
        .template_engine
        .render_template(&blog.config().index_template, globals)
        .await
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn blog_post_handler(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let blog = &app_state.blog;

    let post = match blog.resolve(&slug).await {
        Ok(post) => post,
        Err(e) => {
            if e.status_code().is_server_error() {
                error!("Failed to resolve post {}: {}", slug, e);
            }
            return e.into_response();
        }
    };

    let title = display_title(&post.metadata.title, &post.slug);
    let summary = post.metadata.summary.clone().unwrap_or_default();

    let globals = liquid::object!({
        "post": {
            "slug": post.slug,
            "title": title,
            "date": post.metadata.date,
            "date_formatted": post.metadata.date_formatted(),
            "summary": summary,
            "html_content": post.html_body,
        },
        "url_prefix": blog.config().route_prefix().unwrap_or_default(),
        "page_title": title,
    });

    match app_state
        .template_engine
        .render_template(&blog.config().post_template, globals)
        .await
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn blog_api_handler(State(app_state): State<AppState>) -> Response {
    match app_state.blog.listing().await {
        Ok(listing) => Json(BlogListingResponse {
            skipped: listing.report.gap_count(),
            posts: listing.entries,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to build blog listing: {}", e);
            e.into_response()
        }
    }
}

/// Posts without a title are shown under their slug.
fn display_title(title: &str, slug: &str) -> String {
    if title.trim().is_empty() {
        slug.to_string()
    } else {
        title.to_string()
    }
}
