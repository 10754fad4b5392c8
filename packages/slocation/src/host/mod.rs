//! Host integration
//!
//! The [`LocationStore`](crate::LocationStore) and [`Navigator`](crate::Navigator) never touch a
//! browser directly. They talk to a [`LocationHost`], which reads the current location, mutates
//! the navigation stack and reports navigations the application didn't cause itself.
//!
//! To integrate with any kind of navigation stack, all you have to do is implement the
//! [`LocationHost`] trait. This crate comes with three implementations:
//! - [`MemoryHost`] keeps the whole stack in memory. Use it for tests and headless environments.
//! - [`DetachedHost`] is the fallback used when there is no host at all.
//! - `WebHost` integrates with a browser via the [History API] (requires the `web` feature).
//!
//! [History API]: https://developer.mozilla.org/en-US/docs/Web/API/History_API

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::{LocationConfig, LocationSnapshot, NavigationError};

mod detached;
pub use detached::*;

mod memory;
pub use memory::*;

#[cfg(feature = "web")]
mod web;
#[cfg(feature = "web")]
pub use web::*;

/// The kind of native navigation a host reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeSignal {
    /// Back/forward navigation through the stack (`popstate`).
    PopState,
    /// Navigation to another fragment of the same document (`hashchange`).
    HashChange,
}

/// A callback a host invokes whenever it observes a native navigation.
pub type ChangeHandler = Rc<dyn Fn(ChangeSignal)>;

/// A guard returned by [`LocationHost::on_change`]. Dropping it detaches the handler.
#[must_use = "dropping a `ChangeListener` detaches its handler immediately"]
pub struct ChangeListener {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ChangeListener {
    /// Create a listener that runs `detach` when dropped.
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Create a listener that keeps `guard` alive until dropped, for hosts whose event bindings
    /// already detach themselves on drop.
    pub fn from_guard<T: 'static>(guard: T) -> Self {
        Self::new(move || drop(guard))
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for ChangeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListener")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// The opaque payload stored alongside a navigation stack entry.
///
/// The default state is an empty object, which is what [`Navigator::goto`](crate::Navigator::goto)
/// stores.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryState(Value);

impl HistoryState {
    /// Wrap an arbitrary JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the payload.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the payload.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for HistoryState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// An integration with some kind of navigation stack.
///
/// All methods take `&self`. Hosts are single threaded and use interior mutability where they
/// keep state of their own.
///
/// Depending on your use case, your implementation may deviate from the described procedure.
/// However, the described behaviors mimic a web browser, and
/// [`LocationStore`](crate::LocationStore) relies on `on_change` never invoking its handler for
/// mutations made through `push_entry` or `replace_entry`.
pub trait LocationHost {
    /// Capture the current location.
    ///
    /// Hosts that have no location return [`LocationSnapshot::default`].
    #[must_use]
    fn current_snapshot(&self) -> LocationSnapshot;

    /// Push a new entry onto the navigation stack, discarding any forward entries.
    ///
    /// `url` is resolved against the current location. [`None`] keeps the current URL unchanged.
    fn push_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError>;

    /// Replace the current entry of the navigation stack. The stack depth stays the same.
    ///
    /// `url` is resolved against the current location. [`None`] keeps the current URL unchanged.
    fn replace_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError>;

    /// Start delivering native navigation signals to `handler`.
    ///
    /// Returns [`None`] if the host cannot observe native navigation, in which case nothing is
    /// attached.
    fn on_change(&self, handler: ChangeHandler) -> Option<ChangeListener>;

    /// The number of entries in the navigation stack.
    #[must_use]
    fn depth(&self) -> usize;

    /// Move `delta` entries through the navigation stack. Negative values go back.
    ///
    /// The move is reported through the handlers passed to `on_change`, either right away or once
    /// the host gets to it. A host that can't move that far should do nothing.
    #[allow(unused_variables)]
    fn traverse(&self, delta: isize) -> Result<(), NavigationError> {
        Ok(())
    }
}

/// Pick the host for the current environment.
///
/// When compiled to wasm with the `web` feature and running on a `window` that exposes
/// `history`, this is a `WebHost`. Everywhere else it is a [`DetachedHost`], so code built on
/// top of it never fails in non-interactive contexts.
#[cfg_attr(
    not(all(feature = "web", target_family = "wasm")),
    allow(unused_variables)
)]
pub fn default_host(config: &LocationConfig) -> Rc<dyn LocationHost> {
    #[cfg(all(feature = "web", target_family = "wasm"))]
    {
        if let Some(host) = WebHost::try_new(config.clone()) {
            return Rc::new(host);
        }
    }

    tracing::debug!("no browser history is available, using a detached location host");
    Rc::new(DetachedHost)
}
