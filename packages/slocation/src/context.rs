use std::rc::Rc;

use crate::{
    default_host, HistoryState, LocationConfig, LocationHost, LocationSnapshot, LocationStore,
    NavigationError, Navigator, Subscription,
};

/// The location state of one application: a [`LocationStore`] and a [`Navigator`] sharing a
/// single host.
///
/// Create one at startup and hand it (or clones of it) to whatever needs to observe or change the
/// location. Clones share the same store.
///
/// ```rust
/// # use std::rc::Rc;
/// # use slocation::{LocationContext, MemoryHost};
/// let location = LocationContext::new(Rc::new(MemoryHost::new("https://example.com/a").unwrap()));
///
/// let _subscription = location.subscribe(|location| println!("now at {location}"));
/// location.push_state(serde_json::Value::Null, "", Some("/b")).unwrap();
/// assert_eq!(location.get().pathname, "/b");
/// ```
#[derive(Clone, Debug)]
pub struct LocationContext {
    navigator: Navigator,
}

impl Default for LocationContext {
    fn default() -> Self {
        Self::with_config(&LocationConfig::default())
    }
}

impl LocationContext {
    /// Create a context on top of `host`.
    pub fn new(host: Rc<dyn LocationHost>) -> Self {
        let store = LocationStore::new(host.clone());
        Self {
            navigator: Navigator::new(host, store),
        }
    }

    /// Create a context on the host [`default_host`] picks for the current environment.
    pub fn with_config(config: &LocationConfig) -> Self {
        Self::new(default_host(config))
    }

    /// The observable location.
    pub fn store(&self) -> &LocationStore {
        self.navigator.store()
    }

    /// The navigation helpers.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// See [`LocationStore::subscribe`].
    pub fn subscribe(&self, callback: impl Fn(&LocationSnapshot) + 'static) -> Subscription {
        self.store().subscribe(callback)
    }

    /// See [`LocationStore::get`].
    pub fn get(&self) -> LocationSnapshot {
        self.store().get()
    }

    /// See [`Navigator::goto`].
    pub fn goto(&self, url: &str, replace: bool) -> Result<(), NavigationError> {
        self.navigator.goto(url, replace)
    }

    /// See [`Navigator::push_state`].
    pub fn push_state(
        &self,
        data: impl Into<HistoryState>,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        self.navigator.push_state(data, title, url)
    }

    /// See [`Navigator::replace_state`].
    pub fn replace_state(
        &self,
        data: impl Into<HistoryState>,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        self.navigator.replace_state(data, title, url)
    }

    /// See [`Navigator::reset`].
    pub fn reset(&self) {
        self.navigator.reset()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn default_context_is_detached_off_the_web() {
        let location = LocationContext::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let _sub = location.subscribe(move |location| {
            assert!(location.is_empty());
            counter.set(counter.get() + 1);
        });

        location.goto("/anywhere", false).unwrap();
        location.reset();
        assert_eq!(calls.get(), 3);
        assert!(!location.store().is_listening());
    }

    #[test]
    fn clones_share_the_store() {
        let location = LocationContext::new(Rc::new(crate::MemoryHost::default()));
        let other = location.clone();
        let _sub = location.subscribe(|_| {});
        assert_eq!(other.store().subscriber_count(), 1);

        other.goto("/shared", false).unwrap();
        assert_eq!(location.get().pathname, "/shared");
    }
}
