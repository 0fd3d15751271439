use std::fmt;

use serde::Serialize;
use url::{Host, Url};

/// Reduces a URL to its trust-relevant identity: `scheme://host[:port]`.
///
/// Path, query, fragment and credentials are discarded. Input without a
/// scheme keeps that shape: `host:port` and network-path references
/// (`//host[:port]/...`) reduce to `host[:port]`. A bare `host` with neither
/// scheme nor port reads as a relative path and yields an empty string, as
/// does input that cannot be parsed or has no host. Callers filter empty
/// values out instead of treating them as errors.
///
/// A port written in the input is kept even when it is the scheme's default.
///
/// # Examples
///
/// ```
/// use wopi_trust::domain_only;
///
/// assert_eq!(domain_only("https://office.example.com:9980/hosting/discovery?x=1"),
///            "https://office.example.com:9980");
/// assert_eq!(domain_only("  https://Office.Example.com/  "), "https://office.example.com");
/// assert_eq!(domain_only("office.example.com:9980"), "office.example.com:9980");
/// assert_eq!(domain_only("//office.example.com/browser"), "office.example.com");
/// assert_eq!(domain_only("not a url"), "");
/// ```
pub fn domain_only(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match split_scheme(trimmed) {
        Some(rest) => with_scheme(trimmed, rest),
        None => without_scheme(trimmed),
    }
}

/// Returns what follows `scheme://` when the input starts with a scheme.
fn split_scheme(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(rest)
}

fn with_scheme(input: &str, rest: &str) -> String {
    let Ok(parsed) = Url::parse(input) else {
        return String::new();
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return String::new(),
    };

    // The parser forgets default ports; recover one written explicitly.
    let port = parsed
        .port()
        .or_else(|| split_port(authority(rest)).1.and_then(|p| p.parse().ok()));

    match port {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    }
}

fn without_scheme(input: &str) -> String {
    let (rest, network_path) = match input.strip_prefix("//") {
        Some(rest) => (rest, true),
        None => (input, false),
    };

    let (host, port) = split_port(authority(rest));
    let port = match port.map(str::parse::<u16>) {
        Some(Ok(port)) => Some(port),
        Some(Err(_)) => return String::new(),
        None if network_path => None,
        None => return String::new(),
    };

    let Ok(host) = Host::parse(host) else {
        return String::new();
    };
    match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Returns the `host[:port]` part of an authority, without credentials.
fn authority(rest: &str) -> &str {
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#' | '\\'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    authority.rsplit_once('@').map_or(authority, |(_, host)| host)
}

/// Converts an internationalized domain entry to its ASCII-compatible form.
///
/// Accepts both normalized URLs (`scheme://host[:port]`) and bare host names
/// (`host[:port]`). ASCII input is returned trimmed but otherwise untouched.
/// Entries whose host fails IDNA processing yield an empty string.
///
/// # Examples
///
/// ```
/// use wopi_trust::to_ascii;
///
/// assert_eq!(to_ascii("bücher.example"), "xn--bcher-kva.example");
/// assert_eq!(to_ascii("https://bücher.example:8443"), "https://xn--bcher-kva.example:8443");
/// assert_eq!(to_ascii("a.example.com"), "a.example.com");
/// ```
pub fn to_ascii(entry: &str) -> String {
    let entry = entry.trim();
    if entry.is_ascii() {
        return entry.to_string();
    }

    if entry.contains("://") {
        return domain_only(entry);
    }

    let (host, port) = split_port(entry);
    match Host::parse(host) {
        Ok(host) => match port {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        },
        Err(_) => String::new(),
    }
}

/// Splits a trailing numeric `:port` off a bare host entry.
fn split_port(entry: &str) -> (&str, Option<&str>) {
    if let Some((host, port)) = entry.rsplit_once(':') {
        if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
            return (host, Some(port));
        }
    }
    (entry, None)
}

/// A normalized, ASCII-only trusted origin.
///
/// Either `scheme://host[:port]` or, for input written without a scheme,
/// `host[:port]`. Never empty, never carries a path, query or fragment. Two URLs sharing
/// scheme, host and port produce equal values.
///
/// # Examples
///
/// ```
/// use wopi_trust::TrustedDomain;
///
/// let a = TrustedDomain::parse("https://nc-peer.org/index.php/apps/files").unwrap();
/// let b = TrustedDomain::parse("https://NC-PEER.org").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://nc-peer.org");
///
/// assert!(TrustedDomain::parse("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrustedDomain(String);

impl TrustedDomain {
    /// Normalizes a full URL into a trusted domain.
    ///
    /// Returns `None` when the URL is empty, malformed or has no host.
    pub fn parse(url: &str) -> Option<Self> {
        Self::from_entry(&domain_only(url))
    }

    /// Wraps an already-formatted entry after ASCII conversion.
    ///
    /// Used for sources whose values are configured pre-formatted (for
    /// example bare host names) and must not lose their shape.
    pub(crate) fn from_entry(entry: &str) -> Option<Self> {
        let ascii = to_ascii(entry);
        if ascii.is_empty() {
            None
        } else {
            Some(Self(ascii))
        }
    }

    /// Returns the domain as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the domain and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TrustedDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
