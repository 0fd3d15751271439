//! Capabilities the trust engine consumes from the surrounding platform.
//!
//! The engine never reaches for a global service locator: every collaborator
//! is passed in explicitly. The `Static*` implementations hold plain data and
//! are meant for embedding in tests and simple deployments.
//!
//! All collaborator traits require `Send + Sync`, so one engine can serve
//! concurrent requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{RemoteLookupError, RemoteLookupErrorKind};
use crate::request::Actor;

/// Checks whether a platform feature is enabled for an actor.
pub trait FeatureCheck: Send + Sync {
    /// Returns `true` if `feature` is enabled for `actor` (or globally when no
    /// actor is known).
    fn is_enabled_for_actor(&self, feature: &str, actor: Option<&Actor>) -> bool;
}

/// Registry of federation peers.
///
/// A peer can be registered without being trusted (for example while the
/// trust handshake is still pending).
pub trait PeerRegistry: Send + Sync {
    /// Lists every registered peer identifier.
    fn list_peers(&self) -> Vec<String>;

    /// Returns `true` if the registry currently trusts `peer`.
    fn is_trusted(&self, peer: &str) -> bool;
}

/// Resolves a peer's remote document-processing base URL.
///
/// Implementations are responsible for bounding the time a lookup may take.
pub trait RemoteUrlResolver: Send + Sync {
    /// Returns the office server URL used by `peer`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteLookupError` if the peer is unreachable or does not
    /// expose the integration.
    fn resolve(&self, peer: &str) -> Result<String, RemoteLookupError>;
}

/// Global-scale deployment switch.
pub trait GlobalScale: Send + Sync {
    /// Returns `true` if global-scale mode is enabled.
    fn is_enabled(&self) -> bool;
}

/// Feature check backed by a fixed set of globally enabled features.
///
/// # Examples
///
/// ```
/// use wopi_trust::{FeatureCheck, StaticFeatures};
///
/// let features = StaticFeatures::new().with_feature("federation");
/// assert!(features.is_enabled_for_actor("federation", None));
/// assert!(!features.is_enabled_for_actor("files_sharing", None));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticFeatures {
    enabled: BTreeSet<String>,
    restricted: BTreeMap<String, BTreeSet<String>>,
}

impl StaticFeatures {
    /// Creates a feature check with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables `feature` for every actor.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.enabled.insert(feature.into());
        self
    }

    /// Enables `feature` only for the actor with id `actor_id`.
    pub fn with_feature_for(mut self, feature: impl Into<String>, actor_id: impl Into<String>) -> Self {
        self.restricted
            .entry(feature.into())
            .or_default()
            .insert(actor_id.into());
        self
    }
}

impl FeatureCheck for StaticFeatures {
    fn is_enabled_for_actor(&self, feature: &str, actor: Option<&Actor>) -> bool {
        if self.enabled.contains(feature) {
            return true;
        }
        match (self.restricted.get(feature), actor) {
            (Some(actors), Some(actor)) => actors.contains(&actor.id),
            _ => false,
        }
    }
}

/// Peer registry backed by an in-memory list.
///
/// Peers keep their registration order.
///
/// # Examples
///
/// ```
/// use wopi_trust::{PeerRegistry, StaticPeerRegistry};
///
/// let registry = StaticPeerRegistry::new()
///     .with_peer("https://nc-peer.org", true)
///     .with_peer("https://pending.org", false);
///
/// assert_eq!(registry.list_peers().len(), 2);
/// assert!(registry.is_trusted("https://nc-peer.org"));
/// assert!(!registry.is_trusted("https://pending.org"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPeerRegistry {
    peers: Vec<String>,
    trusted: BTreeSet<String>,
}

impl StaticPeerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `peer`, trusted or not.
    pub fn with_peer(mut self, peer: impl Into<String>, trusted: bool) -> Self {
        let peer = peer.into();
        if trusted {
            self.trusted.insert(peer.clone());
        }
        if !self.peers.contains(&peer) {
            self.peers.push(peer);
        }
        self
    }
}

impl PeerRegistry for StaticPeerRegistry {
    fn list_peers(&self) -> Vec<String> {
        self.peers.clone()
    }

    fn is_trusted(&self, peer: &str) -> bool {
        self.trusted.contains(peer)
    }
}

/// Resolver backed by a fixed peer-to-URL table.
///
/// Unknown peers fail with [`RemoteLookupErrorKind::NotSupported`]. The number
/// of lookups performed is recorded, which lets callers observe that no
/// remote call happened.
///
/// # Examples
///
/// ```
/// use wopi_trust::{RemoteLookupErrorKind, RemoteUrlResolver, StaticResolver};
///
/// let resolver = StaticResolver::new()
///     .with_url("https://nc-peer.org", "https://office.nc-peer.org")
///     .with_failure("https://down.org", RemoteLookupErrorKind::Unreachable);
///
/// assert_eq!(resolver.resolve("https://nc-peer.org").unwrap(), "https://office.nc-peer.org");
/// assert!(resolver.resolve("https://down.org").is_err());
/// assert_eq!(resolver.lookups(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StaticResolver {
    answers: BTreeMap<String, Result<String, RemoteLookupErrorKind>>,
    lookups: AtomicUsize,
}

impl StaticResolver {
    /// Creates a resolver that knows no peers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `peer` to `url`.
    pub fn with_url(mut self, peer: impl Into<String>, url: impl Into<String>) -> Self {
        self.answers.insert(peer.into(), Ok(url.into()));
        self
    }

    /// Makes lookups for `peer` fail with `kind`.
    pub fn with_failure(mut self, peer: impl Into<String>, kind: RemoteLookupErrorKind) -> Self {
        self.answers.insert(peer.into(), Err(kind));
        self
    }

    /// Returns how many lookups were performed.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl RemoteUrlResolver for StaticResolver {
    fn resolve(&self, peer: &str) -> Result<String, RemoteLookupError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        match self.answers.get(peer) {
            Some(Ok(url)) => Ok(url.clone()),
            Some(Err(kind)) => Err(RemoteLookupError::new(peer, *kind)),
            None => Err(RemoteLookupError::new(peer, RemoteLookupErrorKind::NotSupported)),
        }
    }
}

/// Fixed global-scale switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalScaleFlag(bool);

impl GlobalScaleFlag {
    /// Global scale turned on.
    pub fn enabled() -> Self {
        Self(true)
    }

    /// Global scale turned off.
    pub fn disabled() -> Self {
        Self(false)
    }
}

impl GlobalScale for GlobalScaleFlag {
    fn is_enabled(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str) -> Actor {
        Actor {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    #[test]
    fn features_default_to_disabled() {
        let features = StaticFeatures::new();
        assert!(!features.is_enabled_for_actor("federation", None));
        assert!(!features.is_enabled_for_actor("federation", Some(&actor("alice"))));
    }

    #[test]
    fn restricted_feature_requires_matching_actor() {
        let features = StaticFeatures::new().with_feature_for("federation", "alice");

        assert!(features.is_enabled_for_actor("federation", Some(&actor("alice"))));
        assert!(!features.is_enabled_for_actor("federation", Some(&actor("bob"))));
        assert!(!features.is_enabled_for_actor("federation", None));
    }

    #[test]
    fn registry_does_not_duplicate_peers() {
        let registry = StaticPeerRegistry::new()
            .with_peer("https://nc-peer.org", false)
            .with_peer("https://nc-peer.org", true);

        assert_eq!(registry.list_peers(), vec!["https://nc-peer.org".to_string()]);
        assert!(registry.is_trusted("https://nc-peer.org"));
    }

    #[test]
    fn resolver_reports_unknown_peers_as_not_supported() {
        let resolver = StaticResolver::new();
        let error = resolver.resolve("https://unknown.org").unwrap_err();

        assert_eq!(error.kind(), RemoteLookupErrorKind::NotSupported);
        assert_eq!(error.peer(), "https://unknown.org");
        assert_eq!(resolver.lookups(), 1);
    }

    #[test]
    fn resolver_counts_lookups_from_many_threads() {
        let resolver = StaticResolver::new().with_url("https://nc-peer.org", "https://office.nc-peer.org");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        resolver.resolve("https://nc-peer.org").unwrap();
                    }
                });
            }
        });

        assert_eq!(resolver.lookups(), 40);
    }

    #[test]
    fn global_scale_flag() {
        assert!(GlobalScaleFlag::enabled().is_enabled());
        assert!(!GlobalScaleFlag::disabled().is_enabled());
    }
}
