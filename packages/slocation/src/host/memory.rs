use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use url::Url;

use crate::{config::DEFAULT_INITIAL_URL, LocationConfig, LocationSnapshot, NavigationError};

use super::{ChangeHandler, ChangeListener, ChangeSignal, HistoryState, LocationHost};

/// One entry of a [`MemoryHost`]'s navigation stack.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryEntry {
    /// The entry's URL.
    pub url: Url,
    /// The payload the entry was created with.
    pub state: HistoryState,
    /// The title the entry was created with.
    pub title: String,
}

struct MemoryHostState {
    entries: Vec<MemoryEntry>,
    index: usize,
}

impl MemoryHostState {
    fn current(&self) -> &MemoryEntry {
        &self.entries[self.index]
    }
}

type Handlers = RefCell<Vec<(usize, ChangeHandler)>>;

/// A [`LocationHost`] that stores the whole navigation stack in memory.
///
/// Besides the mutations the [`Navigator`](crate::Navigator) performs, it can simulate the
/// navigations a user would trigger in a browser, like pressing the back button or following a
/// fragment link. Those are reported to attached listeners the same way a browser fires
/// `popstate` and `hashchange`.
///
/// ```rust
/// # use slocation::{LocationHost, MemoryHost};
/// let host = MemoryHost::new("https://example.com/a").unwrap();
/// host.push_entry(Default::default(), "", Some("/b")).unwrap();
/// assert_eq!(host.current_snapshot().pathname, "/b");
/// assert_eq!(host.depth(), 2);
///
/// host.back();
/// assert_eq!(host.current_snapshot().pathname, "/a");
/// ```
pub struct MemoryHost {
    state: RefCell<MemoryHostState>,
    handlers: Rc<Handlers>,
    next_handler: Cell<usize>,
    config: LocationConfig,
}

impl Default for MemoryHost {
    fn default() -> Self {
        let url = Url::parse(DEFAULT_INITIAL_URL).expect("the default initial url is valid");
        Self::with_url(url, LocationConfig::default())
    }
}

impl MemoryHost {
    /// Create a [`MemoryHost`] whose stack holds a single entry at `url`.
    pub fn new(url: &str) -> Result<Self, NavigationError> {
        Self::from_config(&LocationConfig::default().initial_url(url))
    }

    /// Create a [`MemoryHost`] starting at the config's initial URL and honouring its signal
    /// toggles.
    pub fn from_config(config: &LocationConfig) -> Result<Self, NavigationError> {
        let url = Url::parse(&config.initial_url).map_err(|source| NavigationError::InvalidUrl {
            url: config.initial_url.clone(),
            source,
        })?;
        Ok(Self::with_url(url, config.clone()))
    }

    fn with_url(url: Url, config: LocationConfig) -> Self {
        Self {
            state: RefCell::new(MemoryHostState {
                entries: vec![MemoryEntry {
                    url,
                    state: HistoryState::new(serde_json::Value::Null),
                    title: String::new(),
                }],
                index: 0,
            }),
            handlers: Default::default(),
            next_handler: Cell::new(0),
            config,
        }
    }

    /// A copy of every entry in the stack, oldest first.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.state.borrow().entries.clone()
    }

    /// The position of the current entry in [`MemoryHost::entries`].
    pub fn index(&self) -> usize {
        self.state.borrow().index
    }

    /// The URL of the current entry.
    pub fn current_url(&self) -> Url {
        self.state.borrow().current().url.clone()
    }

    /// The payload of the current entry.
    pub fn current_state(&self) -> HistoryState {
        self.state.borrow().current().state.clone()
    }

    /// The title of the current entry.
    pub fn current_title(&self) -> String {
        self.state.borrow().current().title.clone()
    }

    /// The number of attached change handlers.
    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Simulate the browser's back button.
    pub fn back(&self) {
        self.go(-1);
    }

    /// Simulate the browser's forward button.
    pub fn forward(&self) {
        self.go(1);
    }

    /// Move `delta` entries through the stack and fire `popstate`. Out of range moves do nothing.
    pub fn go(&self, delta: isize) {
        {
            let mut state = self.state.borrow_mut();
            let target = state.index as isize + delta;
            if delta == 0 || target < 0 || target >= state.entries.len() as isize {
                tracing::trace!(delta, "ignoring out of range traversal");
                return;
            }
            state.index = target as usize;
        }

        self.emit(ChangeSignal::PopState);
    }

    /// Simulate following a link to `#fragment` on the current page.
    ///
    /// This pushes a new entry and fires `popstate` followed by `hashchange`, like a browser does.
    /// Navigating to the fragment the page is already on does nothing. An empty fragment removes
    /// it from the URL.
    pub fn navigate_fragment(&self, fragment: &str) {
        {
            let mut state = self.state.borrow_mut();
            let current = state.current();
            let mut url = current.url.clone();
            url.set_fragment((!fragment.is_empty()).then_some(fragment));
            if url == current.url {
                return;
            }

            let entry = MemoryEntry {
                url,
                state: HistoryState::new(serde_json::Value::Null),
                title: current.title.clone(),
            };
            push(&mut state, entry);
        }

        self.emit(ChangeSignal::PopState);
        self.emit(ChangeSignal::HashChange);
    }

    fn resolve(&self, operation: &'static str, url: Option<&str>) -> Result<Url, NavigationError> {
        let current = self.current_url();
        let Some(url) = url else {
            return Ok(current);
        };

        let resolved = current
            .join(url)
            .map_err(|source| NavigationError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;

        if !same_origin(&current, &resolved) {
            return Err(NavigationError::rejected(
                operation,
                format!(
                    "SecurityError: a history entry with URL '{resolved}' cannot be created in a document with origin '{}'",
                    current.origin().ascii_serialization()
                ),
            ));
        }

        Ok(resolved)
    }

    fn emit(&self, signal: ChangeSignal) {
        let enabled = match signal {
            ChangeSignal::PopState => self.config.pop_state,
            ChangeSignal::HashChange => self.config.hash_change,
        };
        if !enabled {
            return;
        }

        // handlers may attach or detach listeners while running
        let handlers: Vec<ChangeHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        tracing::trace!(?signal, handlers = handlers.len(), "dispatching change signal");
        for handler in handlers {
            handler(signal);
        }
    }
}

fn push(state: &mut MemoryHostState, entry: MemoryEntry) {
    let next = state.index + 1;
    state.entries.truncate(next);
    state.entries.push(entry);
    state.index = next;
}

// opaque origins never compare equal through `Url::origin`, so compare the tuple directly
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

impl LocationHost for MemoryHost {
    fn current_snapshot(&self) -> LocationSnapshot {
        LocationSnapshot::from_url(&self.state.borrow().current().url)
    }

    fn push_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        let url = self.resolve("pushState", url)?;
        let entry = MemoryEntry {
            url,
            state: data,
            title: title.to_string(),
        };
        push(&mut self.state.borrow_mut(), entry);
        Ok(())
    }

    fn replace_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        let url = self.resolve("replaceState", url)?;
        let mut state = self.state.borrow_mut();
        let index = state.index;
        state.entries[index] = MemoryEntry {
            url,
            state: data,
            title: title.to_string(),
        };
        Ok(())
    }

    fn on_change(&self, handler: ChangeHandler) -> Option<ChangeListener> {
        let id = self.next_handler.get();
        self.next_handler.set(id + 1);
        self.handlers.borrow_mut().push((id, handler));

        let handlers = Rc::downgrade(&self.handlers);
        Some(ChangeListener::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers.borrow_mut().retain(|(other, _)| *other != id);
            }
        }))
    }

    fn depth(&self) -> usize {
        self.state.borrow().entries.len()
    }

    fn traverse(&self, delta: isize) -> Result<(), NavigationError> {
        self.go(delta);
        Ok(())
    }
}
