use super::{
    cookie::{get_query_value, theme_cookie},
    types::{THEME_KEY, Theme},
};
use axum::{
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

/// Persists `?theme=` in a cookie and sends the browser back where it came
/// from. Without a theme parameter nothing is stored.
pub async fn set_theme_handler(uri: Uri, headers: HeaderMap) -> Response {
    let target = redirect_target(&headers);

    let Some(value) = get_query_value(&uri, THEME_KEY) else {
        return Redirect::to(&target).into_response();
    };

    match value.parse::<Theme>() {
        Ok(theme) => {
            info!("Setting theme cookie to {}", theme);
            (
                [(header::SET_COOKIE, theme_cookie(theme))],
                Redirect::to(&target),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Rejected theme change: {}", e);
            (StatusCode::BAD_REQUEST, "Unknown theme").into_response()
        }
    }
}

/// Path of the referring page, or `/`. Only the path is kept so the redirect
/// never leaves the site.
fn redirect_target(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| url.path().to_string())
        .unwrap_or_else(|| "/".to_string())
}
