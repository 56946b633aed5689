#[cfg(test)]
mod tests {
    use super::super::*;
    use axum::http::{HeaderMap, HeaderValue, Uri, header};
    use std::sync::{Arc, Mutex};

    fn cookie_headers(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(" dark ".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(
            "purple".parse::<Theme>(),
            Err(UnknownTheme("purple".to_string()))
        );
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_query_beats_cookie() {
        let uri: Uri = "/?theme=dark".parse().unwrap();
        let headers = cookie_headers("theme=light");
        assert_eq!(requested_theme(&uri, &headers), Some(Theme::Dark));
    }

    #[test]
    fn test_cookie_only() {
        let uri: Uri = "/blog".parse().unwrap();
        let headers = cookie_headers("session=abc; theme=light");
        assert_eq!(requested_theme(&uri, &headers), Some(Theme::Light));
    }

    #[test]
    fn test_no_theme_source() {
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(requested_theme(&uri, &HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_query_falls_back_to_cookie() {
        let uri: Uri = "/?theme=".parse().unwrap();
        let headers = cookie_headers("theme=dark");
        assert_eq!(requested_theme(&uri, &headers), Some(Theme::Dark));
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let uri: Uri = "/?theme=%3Cscript%3E".parse().unwrap();
        let headers = cookie_headers("theme=dark");
        assert_eq!(requested_theme(&uri, &headers), Some(Theme::Dark));

        let uri: Uri = "/".parse().unwrap();
        let headers = cookie_headers("theme=neon");
        assert_eq!(requested_theme(&uri, &headers), None);
    }

    #[test]
    fn test_form_action_query() {
        let uri: Uri = "/?/setTheme&theme=dark".parse().unwrap();
        assert_eq!(requested_theme(&uri, &HeaderMap::new()), Some(Theme::Dark));
    }

    #[test]
    fn test_placeholder_rewrite() {
        let html = r#"<html lang="en" data-theme=""><body data-theme=""></body></html>"#;
        assert_eq!(
            apply_theme_placeholder(html, Theme::Dark),
            r#"<html lang="en" data-theme="dark"><body data-theme=""></body></html>"#
        );
        assert_eq!(apply_theme_placeholder("<p>plain</p>", Theme::Light), "<p>plain</p>");
    }

    #[test]
    fn test_theme_cookie_attributes() {
        let cookie = theme_cookie(Theme::Dark);
        assert!(cookie.starts_with("theme=dark;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
    }

    #[test]
    fn test_store_starts_light() {
        let store = ThemeStore::new();
        assert_eq!(store.get(), Theme::Light);
        assert!(!store.is_mounted());
    }

    #[test]
    fn test_mount_with_dark_preference() {
        let store = ThemeStore::new();
        assert_eq!(store.mount(&FixedColorScheme(Some(true))), Theme::Dark);
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn test_mount_without_preference_support() {
        let store = ThemeStore::new();
        assert_eq!(store.mount(&FixedColorScheme(None)), Theme::Light);
    }

    #[test]
    fn test_mount_checks_match_not_presence() {
        let store = ThemeStore::new();
        assert_eq!(store.mount(&FixedColorScheme(Some(false))), Theme::Light);
    }

    #[test]
    fn test_mount_runs_once() {
        let store = ThemeStore::new();
        store.mount(&FixedColorScheme(None));
        store.mount(&FixedColorScheme(Some(true)));
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn test_subscribers_are_notified_synchronously() {
        let store = ThemeStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorder = seen.clone();
        let subscription = store.subscribe(move |theme| recorder.lock().unwrap().push(theme));

        store.set(Theme::Dark);
        store.update(|_| Theme::Light);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Theme::Light, Theme::Dark, Theme::Light]
        );

        drop(subscription);
        assert_eq!(store.subscriber_count(), 0);
        store.set(Theme::Dark);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = ThemeStore::new();
        let flip = |theme: Theme| match theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..1001 {
                        store.update(flip);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 4004 flips from light land back on light.
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn test_subscriber_may_read_store() {
        let store = ThemeStore::new();
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(None));
        let slot = seen.clone();

        let _subscription = store.subscribe(move |_| *slot.lock().unwrap() = Some(reader.get()));
        store.set(Theme::Dark);

        assert_eq!(*seen.lock().unwrap(), Some(Theme::Dark));
    }

    #[derive(Default)]
    struct FakeRoot {
        attributes: Mutex<Vec<(String, String)>>,
    }

    impl DocumentRoot for FakeRoot {
        fn set_attribute(&self, name: &str, value: &str) {
            self.attributes
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
        }
    }

    #[test]
    fn test_document_mirror_is_separate_from_store() {
        let store = ThemeStore::new();
        assert_eq!(store.subscriber_count(), 0);

        let root = Arc::new(FakeRoot::default());
        let _mirror = mirror_to_document(&store, root.clone());
        store.mount(&FixedColorScheme(Some(true)));

        let attributes = root.attributes.lock().unwrap();
        assert_eq!(
            *attributes,
            vec![
                ("data-theme".to_string(), "light".to_string()),
                ("data-theme".to_string(), "dark".to_string()),
            ]
        );
    }
}
