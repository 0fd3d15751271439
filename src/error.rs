use std::fmt;

use thiserror::Error;

/// Errors surfaced by the trust engine.
///
/// Most trust failures are not errors: missing configuration, unreachable peers
/// during enumeration, malformed URLs and untrusted claims all degrade to a
/// smaller trust set or "no grant". Only the cases below reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A peer confirmed as trusted could not be resolved while granting it
    /// embedding rights for a single request.
    #[error("trusted peer '{peer}' could not be resolved: {source}")]
    PeerUnreachable {
        /// The claimed peer identifier
        peer: String,
        /// The resolver failure
        source: RemoteLookupError,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error returned by a [`RemoteUrlResolver`](crate::RemoteUrlResolver) lookup.
///
/// # Examples
///
/// ```
/// use wopi_trust::{RemoteLookupError, RemoteLookupErrorKind};
///
/// let error = RemoteLookupError::new("https://nc-peer.org", RemoteLookupErrorKind::Unreachable);
/// assert_eq!(error.kind(), RemoteLookupErrorKind::Unreachable);
/// assert_eq!(error.peer(), "https://nc-peer.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote lookup for '{peer}' failed: {kind}")]
pub struct RemoteLookupError {
    peer: String,
    kind: RemoteLookupErrorKind,
}

impl RemoteLookupError {
    /// Creates a new lookup error for the given peer.
    pub fn new(peer: impl Into<String>, kind: RemoteLookupErrorKind) -> Self {
        Self {
            peer: peer.into(),
            kind,
        }
    }

    /// Returns the peer the lookup was made for.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Returns the error kind.
    pub fn kind(&self) -> RemoteLookupErrorKind {
        self.kind
    }
}

/// Kind of remote lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteLookupErrorKind {
    /// The peer did not answer.
    Unreachable,
    /// The peer answered but does not expose the office integration.
    NotSupported,
    /// The peer answered with something that is not a usable URL.
    InvalidResponse,
}

impl fmt::Display for RemoteLookupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "peer unreachable"),
            Self::NotSupported => write!(f, "integration not available on peer"),
            Self::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
