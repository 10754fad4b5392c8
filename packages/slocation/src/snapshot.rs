use std::fmt::{self, Display};

use url::Url;

/// A plain-value copy of the host's current location.
///
/// Every field uses the same format as the matching property of the browser
/// [`Location`](https://developer.mozilla.org/en-US/docs/Web/API/Location) object, so `protocol`
/// keeps its trailing `:`, `search` keeps its leading `?` and `hash` keeps its leading `#`. Fields
/// that are absent from the URL are empty strings.
///
/// A snapshot never refers back to the host, so holding on to one can't observe a later
/// navigation.
///
/// ```rust
/// # use slocation::LocationSnapshot;
/// let url = url::Url::parse("https://example.com:8443/docs?page=2#intro").unwrap();
/// let snapshot = LocationSnapshot::from_url(&url);
///
/// assert_eq!(snapshot.protocol, "https:");
/// assert_eq!(snapshot.host, "example.com:8443");
/// assert_eq!(snapshot.pathname, "/docs");
/// assert_eq!(snapshot.search, "?page=2");
/// assert_eq!(snapshot.hash, "#intro");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationSnapshot {
    /// The full URL.
    pub href: String,
    /// The scheme, including the trailing `:`.
    pub protocol: String,
    /// The hostname, followed by `:port` when the port isn't the scheme's default.
    pub host: String,
    /// The hostname without a port.
    pub hostname: String,
    /// The port, or an empty string when it's the scheme's default.
    pub port: String,
    /// The path, starting with `/` for hierarchical URLs.
    pub pathname: String,
    /// The query string including the leading `?`, or an empty string.
    pub search: String,
    /// The fragment including the leading `#`, or an empty string.
    pub hash: String,
    /// The serialized origin. URLs with an opaque origin serialize to `"null"`.
    pub origin: String,
}

impl LocationSnapshot {
    /// Capture a snapshot of a parsed URL.
    pub fn from_url(url: &Url) -> Self {
        let hostname = url.host_str().unwrap_or_default().to_string();
        let port = url.port().map(|port| port.to_string()).unwrap_or_default();
        let host = match port.is_empty() {
            true => hostname.clone(),
            false => format!("{hostname}:{port}"),
        };

        Self {
            href: url.as_str().to_string(),
            protocol: format!("{}:", url.scheme()),
            host,
            hostname,
            port,
            pathname: url.path().to_string(),
            search: prefixed('?', url.query()),
            hash: prefixed('#', url.fragment()),
            origin: url.origin().ascii_serialization(),
        }
    }

    /// Whether this is the empty snapshot produced when no host is available.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Display for LocationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}

// `?` and `#` on their own serialize to an empty string, like the browser does
fn prefixed(prefix: char, part: Option<&str>) -> String {
    match part {
        Some(part) if !part.is_empty() => format!("{prefix}{part}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(url: &str) -> LocationSnapshot {
        LocationSnapshot::from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn default_port_is_omitted() {
        let snapshot = snapshot("https://example.com:443/a");
        assert_eq!(snapshot.port, "");
        assert_eq!(snapshot.host, "example.com");
        assert_eq!(snapshot.origin, "https://example.com");
        assert_eq!(snapshot.href, "https://example.com/a");
    }

    #[test]
    fn explicit_port_is_kept() {
        let snapshot = snapshot("http://localhost:8080/");
        assert_eq!(snapshot.port, "8080");
        assert_eq!(snapshot.hostname, "localhost");
        assert_eq!(snapshot.host, "localhost:8080");
        assert_eq!(snapshot.origin, "http://localhost:8080");
    }

    #[test]
    fn empty_query_and_fragment_are_blank() {
        let snapshot = snapshot("http://localhost/path?#");
        assert_eq!(snapshot.search, "");
        assert_eq!(snapshot.hash, "");
        assert_eq!(snapshot.pathname, "/path");
    }

    #[test]
    fn opaque_origin() {
        let snapshot = snapshot("dioxus://index.html/");
        assert_eq!(snapshot.origin, "null");
        assert_eq!(snapshot.protocol, "dioxus:");
    }

    #[test]
    fn default_is_empty() {
        assert!(LocationSnapshot::default().is_empty());
        assert!(!snapshot("http://localhost/").is_empty());
        assert_eq!(snapshot("http://localhost/x").to_string(), "http://localhost/x");
    }
}
