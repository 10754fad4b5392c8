use gloo_events::EventListener;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{History, Location, Window};

use crate::{LocationConfig, LocationSnapshot, NavigationError};

use super::{ChangeHandler, ChangeListener, ChangeSignal, HistoryState, LocationHost};

/// A [`LocationHost`] that integrates with a browser via the [History API] and [Location API].
///
/// [History API]: https://developer.mozilla.org/en-US/docs/Web/API/History_API
/// [Location API]: https://developer.mozilla.org/en-US/docs/Web/API/Location
///
/// Entry payloads are converted to plain JS objects, so they survive the structured clone the
/// browser performs when storing them.
pub struct WebHost {
    config: LocationConfig,
    history: History,
    window: Window,
}

impl WebHost {
    /// Create a [`WebHost`] for the current `window`.
    ///
    /// Returns [`None`] when there is no `window` (e.g. inside a web worker) or it doesn't expose
    /// `history`.
    pub fn try_new(config: LocationConfig) -> Option<Self> {
        let window = web_sys::window()?;
        let history = window.history().ok()?;

        Some(Self {
            config,
            history,
            window,
        })
    }

    fn to_js(data: &HistoryState) -> Result<JsValue, NavigationError> {
        data.as_value()
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| NavigationError::Serialize(err.to_string()))
    }
}

fn read_location(location: &Location) -> Result<LocationSnapshot, JsValue> {
    Ok(LocationSnapshot {
        href: location.href()?,
        protocol: location.protocol()?,
        host: location.host()?,
        hostname: location.hostname()?,
        port: location.port()?,
        pathname: location.pathname()?,
        search: location.search()?,
        hash: location.hash()?,
        origin: location.origin()?,
    })
}

fn describe(err: JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(err.name()), String::from(err.message()));
    }

    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl LocationHost for WebHost {
    fn current_snapshot(&self) -> LocationSnapshot {
        read_location(&self.window.location()).unwrap_or_else(|err| {
            tracing::warn!("failed to read the current location: {}", describe(err));
            LocationSnapshot::default()
        })
    }

    fn push_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        let data = Self::to_js(&data)?;
        self.history
            .push_state_with_url(&data, title, url)
            .map_err(|err| NavigationError::rejected("pushState", describe(err)))
    }

    fn replace_entry(
        &self,
        data: HistoryState,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        let data = Self::to_js(&data)?;
        self.history
            .replace_state_with_url(&data, title, url)
            .map_err(|err| NavigationError::rejected("replaceState", describe(err)))
    }

    fn on_change(&self, handler: ChangeHandler) -> Option<ChangeListener> {
        let mut listeners = Vec::new();

        if self.config.pop_state {
            let handler = handler.clone();
            listeners.push(EventListener::new(&self.window, "popstate", move |_| {
                handler(ChangeSignal::PopState)
            }));
        }

        if self.config.hash_change {
            listeners.push(EventListener::new(&self.window, "hashchange", move |_| {
                handler(ChangeSignal::HashChange)
            }));
        }

        match listeners.is_empty() {
            true => None,
            false => Some(ChangeListener::from_guard(listeners)),
        }
    }

    fn depth(&self) -> usize {
        self.history.length().map(|len| len as usize).unwrap_or_default()
    }

    fn traverse(&self, delta: isize) -> Result<(), NavigationError> {
        self.history
            .go_with_delta(delta as i32)
            .map_err(|err| NavigationError::rejected("go", describe(err)))
    }
}
