/// The URL a [`MemoryHost`](crate::MemoryHost) starts at when none is configured.
pub const DEFAULT_INITIAL_URL: &str = "http://localhost/";

/// Configuration shared by the host adapters.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use slocation::LocationConfig;
/// let cfg = LocationConfig::default()
///     .hash_change(false)
///     .initial_url("https://example.com/a");
///
/// assert!(cfg.listens_to_pop_state());
/// assert!(!cfg.listens_to_hash_change());
/// ```
#[derive(Clone, Debug)]
pub struct LocationConfig {
    pub(crate) pop_state: bool,
    pub(crate) hash_change: bool,
    pub(crate) initial_url: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            pop_state: true,
            hash_change: true,
            initial_url: DEFAULT_INITIAL_URL.to_string(),
        }
    }
}

impl LocationConfig {
    /// Listen for back/forward navigation (`popstate`).
    ///
    /// Defaults to [`true`].
    pub fn pop_state(self, enabled: bool) -> Self {
        Self {
            pop_state: enabled,
            ..self
        }
    }

    /// Listen for fragment navigation (`hashchange`).
    ///
    /// Defaults to [`true`].
    pub fn hash_change(self, enabled: bool) -> Self {
        Self {
            hash_change: enabled,
            ..self
        }
    }

    /// The URL an in-memory host starts at. Browser hosts ignore this.
    ///
    /// Defaults to [`DEFAULT_INITIAL_URL`].
    pub fn initial_url(self, url: impl Into<String>) -> Self {
        Self {
            initial_url: url.into(),
            ..self
        }
    }

    /// Whether hosts should deliver `popstate` signals.
    pub fn listens_to_pop_state(&self) -> bool {
        self.pop_state
    }

    /// Whether hosts should deliver `hashchange` signals.
    pub fn listens_to_hash_change(&self) -> bool {
        self.hash_change
    }
}
