pub mod cookie;
pub mod handlers;
pub mod store;
pub mod types;

pub use cookie::{apply_theme_placeholder, inject_theme, requested_theme, theme_cookie};
pub use handlers::set_theme_handler;
pub use store::{ColorSchemeQuery, DocumentRoot, FixedColorScheme, Subscription, ThemeStore, mirror_to_document};
pub use types::{Theme, UnknownTheme};

#[cfg(test)]
mod tests;
