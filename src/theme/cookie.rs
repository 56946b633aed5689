use super::types::*;
use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
}

/// First non-empty value of a query parameter.
pub fn get_query_value(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn parse_theme(value: Option<String>, origin: &str) -> Option<Theme> {
    let value = value?;
    match value.parse() {
        Ok(theme) => Some(theme),
        Err(e) => {
            debug!("Ignoring {} theme: {}", origin, e);
            None
        }
    }
}

/// Theme requested for this response: query parameter first, then cookie.
pub fn requested_theme(uri: &Uri, headers: &HeaderMap) -> Option<Theme> {
    parse_theme(get_query_value(uri, THEME_KEY), "query")
        .or_else(|| parse_theme(get_cookie_value(headers, THEME_KEY), "cookie"))
}

pub fn theme_cookie(theme: Theme) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        THEME_KEY, theme, THEME_COOKIE_MAX_AGE
    )
}

/// Fills the first empty `data-theme` attribute.
pub fn apply_theme_placeholder(html: &str, theme: Theme) -> String {
    html.replacen(
        THEME_PLACEHOLDER,
        &format!(r#"{}="{}""#, THEME_ATTRIBUTE, theme),
        1,
    )
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/html"))
        .unwrap_or(false)
}

/// Middleware writing the requested theme into server-rendered HTML. Pages
/// without a known theme keep the empty placeholder for the client to fill.
pub async fn inject_theme(request: Request, next: Next) -> Response {
    let theme = requested_theme(request.uri(), request.headers());
    let response = next.run(request).await;

    match theme {
        Some(theme) if is_html(&response) => rewrite_html(response, theme).await,
        _ => response,
    }
}

async fn rewrite_html(response: Response, theme: Theme) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to buffer page for theme injection: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = match std::str::from_utf8(&bytes) {
        Ok(html) => Body::from(apply_theme_placeholder(html, theme)),
        Err(_) => Body::from(bytes),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, body)
}
