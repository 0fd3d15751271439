use crate::collaborators::{FeatureCheck, PeerRegistry, RemoteUrlResolver};
use crate::normalize::domain_only;
use crate::request::Actor;
use crate::FEDERATION_FEATURE;

/// Trusted federation peers and the office servers they use.
///
/// Peers are enumerated fresh on every call; nothing is cached, since a peer
/// can be revoked at any time.
#[derive(Clone, Copy)]
pub struct FederationTrustSource<'a> {
    features: &'a dyn FeatureCheck,
    registry: &'a dyn PeerRegistry,
    resolver: &'a dyn RemoteUrlResolver,
}

impl<'a> FederationTrustSource<'a> {
    /// Creates a source over the given collaborators.
    pub fn new(
        features: &'a dyn FeatureCheck,
        registry: &'a dyn PeerRegistry,
        resolver: &'a dyn RemoteUrlResolver,
    ) -> Self {
        Self {
            features,
            registry,
            resolver,
        }
    }

    /// Returns the registered peers the registry currently trusts.
    pub fn trusted_peers(&self) -> Vec<String> {
        self.registry
            .list_peers()
            .into_iter()
            .filter(|peer| self.registry.is_trusted(peer))
            .collect()
    }

    /// Returns the normalized domains of trusted peers, followed by the
    /// normalized domains of their office servers.
    ///
    /// Yields nothing, without touching the registry, when federation is not
    /// enabled for `actor`. A peer whose office server cannot be resolved is
    /// left out of the second half; the failure is logged and not retried.
    /// Identifiers that do not normalize come back as `""` and are dropped by
    /// the aggregator.
    pub fn domains(&self, actor: Option<&Actor>) -> Vec<String> {
        if !self.features.is_enabled_for_actor(FEDERATION_FEATURE, actor) {
            tracing::debug!("federation not enabled, no peer domains");
            return Vec::new();
        }

        let trusted = self.trusted_peers();
        let office_urls: Vec<String> = trusted
            .iter()
            .filter_map(|peer| match self.resolver.resolve(peer) {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::debug!(peer = %peer, error = %error, "skipping peer office server");
                    None
                }
            })
            .collect();

        trusted
            .iter()
            .chain(office_urls.iter())
            .map(|url| domain_only(url))
            .collect()
    }
}
