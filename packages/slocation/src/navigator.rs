use std::rc::Rc;

use crate::{HistoryState, LocationHost, LocationStore, NavigationError};

/// Programmatic navigation that keeps a [`LocationStore`] up to date.
///
/// Browsers don't report `pushState` and `replaceState` to anyone. The [`Navigator`] closes that
/// gap: after each mutation succeeds it calls [`LocationStore::sync`], so by the time a method
/// returns every subscriber has already seen the new location.
///
/// ```rust
/// # use std::{cell::RefCell, rc::Rc};
/// # use slocation::{LocationStore, MemoryHost, Navigator};
/// let host = Rc::new(MemoryHost::new("https://example.com/a").unwrap());
/// let store = LocationStore::new(host.clone());
/// let navigator = Navigator::new(host, store.clone());
///
/// let path = Rc::new(RefCell::new(String::new()));
/// let sink = path.clone();
/// let _subscription = store.subscribe(move |location| *sink.borrow_mut() = location.pathname.clone());
///
/// navigator.goto("/next", false).unwrap();
/// assert_eq!(*path.borrow(), "/next");
/// ```
#[derive(Clone)]
pub struct Navigator {
    host: Rc<dyn LocationHost>,
    store: LocationStore,
}

impl Navigator {
    /// Create a [`Navigator`] that mutates `host` and reports to `store`.
    ///
    /// `store` should have been created on the same host, otherwise its subscribers will see the
    /// wrong location.
    pub fn new(host: Rc<dyn LocationHost>, store: LocationStore) -> Self {
        Self { host, store }
    }

    /// The store this navigator reports to.
    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Navigate to `url`, pushing a new entry or replacing the current one.
    ///
    /// The entry's state is an empty object and its title is empty. An empty `url` keeps the
    /// current URL.
    pub fn goto(&self, url: &str, replace: bool) -> Result<(), NavigationError> {
        let url = (!url.is_empty()).then_some(url);
        match replace {
            true => self.replace_state(HistoryState::default(), "", url),
            false => self.push_state(HistoryState::default(), "", url),
        }
    }

    /// Push a new entry carrying `data` and `title`. [`None`] keeps the current URL.
    pub fn push_state(
        &self,
        data: impl Into<HistoryState>,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        tracing::trace!(?url, "pushState");
        self.host
            .push_entry(data.into(), title, url)
            .inspect_err(|err| tracing::warn!("failed to push state: {err}"))?;
        self.store.sync();
        Ok(())
    }

    /// Replace the current entry with one carrying `data` and `title`. [`None`] keeps the
    /// current URL.
    pub fn replace_state(
        &self,
        data: impl Into<HistoryState>,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        tracing::trace!(?url, "replaceState");
        self.host
            .replace_entry(data.into(), title, url)
            .inspect_err(|err| tracing::warn!("failed to replace state: {err}"))?;
        self.store.sync();
        Ok(())
    }

    /// Deliver the current location to every subscriber without navigating.
    ///
    /// Use this after something outside of the navigator changed the location, e.g. a third party
    /// script calling `history.pushState` directly.
    pub fn reset(&self) {
        tracing::trace!("reset");
        self.store.sync();
    }

    /// Go back one entry. Subscribers are notified once the host reports the navigation.
    pub fn back(&self) -> Result<(), NavigationError> {
        self.go(-1)
    }

    /// Go forward one entry. Subscribers are notified once the host reports the navigation.
    pub fn forward(&self) -> Result<(), NavigationError> {
        self.go(1)
    }

    /// Move `delta` entries through the navigation stack.
    ///
    /// Unlike the other methods this doesn't sync the store itself. Traversal is reported by the
    /// host as a native navigation, which in a browser happens asynchronously.
    pub fn go(&self, delta: isize) -> Result<(), NavigationError> {
        self.host
            .traverse(delta)
            .inspect_err(|err| tracing::warn!("failed to traverse history: {err}"))
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::{LocationSnapshot, MemoryHost, Subscription};

    struct Fixture {
        host: Rc<MemoryHost>,
        navigator: Navigator,
        seen: Rc<RefCell<Vec<LocationSnapshot>>>,
        _subscription: Subscription,
    }

    fn fixture(url: &str) -> Fixture {
        let host = Rc::new(MemoryHost::new(url).unwrap());
        let store = LocationStore::new(host.clone());
        let seen: Rc<RefCell<Vec<LocationSnapshot>>> = Default::default();
        let sink = seen.clone();
        let subscription = store.subscribe(move |location| sink.borrow_mut().push(location.clone()));
        Fixture {
            navigator: Navigator::new(host.clone(), store),
            host,
            seen,
            _subscription: subscription,
        }
    }

    impl Fixture {
        fn paths(&self) -> Vec<String> {
            self.seen
                .borrow()
                .iter()
                .map(|location| location.pathname.clone())
                .collect()
        }
    }

    #[test]
    fn goto_pushes_by_default() {
        let fx = fixture("https://example.com/a");
        fx.navigator.goto("/next", false).unwrap();
        assert_eq!(fx.paths(), ["/a", "/next"]);
        assert_eq!(fx.host.depth(), 2);
        assert_eq!(fx.host.current_state(), HistoryState::default());
    }

    #[test]
    fn goto_replace_keeps_depth() {
        let fx = fixture("https://example.com/a");
        fx.navigator.goto("/c", true).unwrap();
        assert_eq!(fx.paths(), ["/a", "/c"]);
        assert_eq!(fx.host.depth(), 1);
    }

    #[test]
    fn goto_empty_url_keeps_location() {
        let fx = fixture("https://example.com/a#frag");
        fx.navigator.goto("", false).unwrap();
        assert_eq!(fx.host.depth(), 2);
        assert_eq!(fx.seen.borrow()[1].href, "https://example.com/a#frag");
    }

    #[test]
    fn push_state_stores_payload() {
        let fx = fixture("https://example.com/a");
        fx.navigator
            .push_state(json!({ "page": 2 }), "Page 2", Some("/b?page=2"))
            .unwrap();
        assert_eq!(fx.host.current_state().as_value(), &json!({ "page": 2 }));
        assert_eq!(fx.host.current_title(), "Page 2");
        assert_eq!(fx.seen.borrow().last().unwrap().search, "?page=2");
    }

    #[test]
    fn replace_state_without_url() {
        let fx = fixture("https://example.com/a?q=1");
        fx.navigator
            .replace_state(json!("scrolled"), "", None)
            .unwrap();
        assert_eq!(fx.host.depth(), 1);
        assert_eq!(fx.host.current_state().as_value(), &json!("scrolled"));
        assert_eq!(fx.seen.borrow().len(), 2);
        assert_eq!(fx.seen.borrow()[1].href, "https://example.com/a?q=1");
    }

    #[test]
    fn rejected_mutation_does_not_notify() {
        let fx = fixture("https://example.com/a");
        let err = fx
            .navigator
            .goto("https://other.example/", false)
            .unwrap_err();
        assert!(matches!(err, NavigationError::Rejected { .. }));
        assert_eq!(fx.paths(), ["/a"]);
    }

    #[test]
    fn reset_picks_up_out_of_band_changes() {
        let fx = fixture("https://example.com/a");
        fx.host
            .push_entry(Default::default(), "", Some("/elsewhere"))
            .unwrap();
        assert_eq!(fx.paths(), ["/a"]);

        fx.navigator.reset();
        assert_eq!(fx.paths(), ["/a", "/elsewhere"]);
    }

    #[test]
    fn traversal_is_reported_by_the_host() {
        let fx = fixture("https://example.com/a");
        fx.navigator.goto("/b", false).unwrap();
        fx.navigator.back().unwrap();
        fx.navigator.forward().unwrap();
        fx.navigator.go(5).unwrap();
        assert_eq!(fx.paths(), ["/a", "/b", "/a", "/b"]);
    }
}
