//! Client-side theme state.
//!
//! [`ThemeStore`] is a plain observable value. It knows nothing about the
//! document; writing the theme onto the page is done by a separate subscriber
//! created with [`mirror_to_document`], so the two can be composed (or not)
//! where the page is assembled.

use super::types::{THEME_ATTRIBUTE, Theme};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

/// The rendering environment's colour scheme preference.
pub trait ColorSchemeQuery {
    /// `Some(matches)` for `(prefers-color-scheme: dark)`, or `None` when the
    /// environment cannot answer the query.
    fn prefers_dark(&self) -> Option<bool>;
}

/// An environment with a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedColorScheme(pub Option<bool>);

impl ColorSchemeQuery for FixedColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

/// The document root element the theme is mirrored onto.
pub trait DocumentRoot: Send + Sync {
    fn set_attribute(&self, name: &str, value: &str);
}

type Subscriber = Arc<dyn Fn(Theme) + Send + Sync>;

struct StoreInner {
    value: Theme,
    mounted: bool,
    next_id: u64,
    subscribers: Vec<(u64, Subscriber)>,
}

#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                value: Theme::Light,
                mounted: false,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Theme {
        self.lock().value
    }

    pub fn set(&self, theme: Theme) {
        self.update(|_| theme);
    }

    /// Replaces the value with `f(current)` atomically, then notifies
    /// subscribers. `f` runs under the store lock and must not call back into
    /// the store.
    pub fn update(&self, f: impl FnOnce(Theme) -> Theme) {
        let (theme, subscribers): (Theme, Vec<Subscriber>) = {
            let mut inner = self.lock();
            inner.value = f(inner.value);
            let subscribers = inner.subscribers.iter().map(|(_, s)| s.clone()).collect();
            (inner.value, subscribers)
        };

        for subscriber in subscribers {
            subscriber(theme);
        }
    }

    /// Registers `subscriber`, calling it right away with the current value and
    /// then synchronously on every change. Dropping the returned handle
    /// unsubscribes.
    pub fn subscribe(&self, subscriber: impl Fn(Theme) + Send + Sync + 'static) -> Subscription {
        let subscriber: Subscriber = Arc::new(subscriber);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, subscriber.clone()));
            (id, inner.value)
        };

        subscriber(current);

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Seeds the store from the environment's colour scheme. Must only be
    /// called once a rendering environment exists; later calls are ignored.
    pub fn mount(&self, environment: &dyn ColorSchemeQuery) -> Theme {
        {
            let mut inner = self.lock();
            if inner.mounted {
                return inner.value;
            }
            inner.mounted = true;
        }

        match environment.prefers_dark() {
            Some(true) => self.set(Theme::Dark),
            // A supported query that does not match is not a dark preference.
            Some(false) => debug!("Colour scheme query does not prefer dark"),
            None => debug!("Colour scheme query unsupported"),
        }

        self.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }
}

/// Keeps a subscriber registered until dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<Mutex<StoreInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            let mut inner = store.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Writes every store value onto the document root's `data-theme` attribute.
/// Hold the returned subscription for as long as the page lives.
pub fn mirror_to_document<D>(store: &ThemeStore, root: Arc<D>) -> Subscription
where
    D: DocumentRoot + 'static,
{
    store.subscribe(move |theme| root.set_attribute(THEME_ATTRIBUTE, theme.as_str()))
}
