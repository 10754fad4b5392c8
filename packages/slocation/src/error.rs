/// An error returned when the host refuses a navigation.
///
/// A missing host is never an error. Stores and navigators built without one fall back to the
/// [`DetachedHost`](crate::DetachedHost) instead.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The host rejected the mutation, for example because the target URL has a different origin
    /// or a storage quota was exceeded.
    #[error("the host rejected `{operation}`: {reason}")]
    Rejected {
        /// The host operation that failed, e.g. `pushState`.
        operation: &'static str,
        /// The reason reported by the host.
        reason: String,
    },

    /// The URL could not be resolved against the current location.
    #[error("failed to resolve `{url}` against the current location")]
    InvalidUrl {
        /// The URL as passed by the caller.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The entry payload could not be converted into a value the host can store.
    #[error("failed to serialize the history state: {0}")]
    Serialize(String),
}

impl NavigationError {
    pub(crate) fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}
