use crate::collaborators::{FeatureCheck, PeerRegistry, RemoteUrlResolver};
use crate::config::AppConfig;
use crate::error::{Error, RemoteLookupError, RemoteLookupErrorKind};
use crate::normalize::TrustedDomain;
use crate::policy::{EmbeddingPolicy, PolicyBuilder, PolicySink, PolicySupport, SELF};
use crate::request::PolicyRequest;
use crate::{FEDERATED_EDITING_PREFIX, FEDERATION_FEATURE};

/// What happens when a confirmed peer cannot be resolved during a dynamic
/// grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantFailureMode {
    /// Serve the response without the grant and log a warning.
    #[default]
    Deny,
    /// Fail the request with [`Error::PeerUnreachable`].
    Surface,
}

/// Builds the embedding policy for one response.
///
/// Two independent tracks feed the policy:
/// - **static**: `'self'` plus the configured office server, as frame
///   ancestor and (when supported) form-action target
/// - **dynamic**: on federated editing paths, a peer named by the request's
///   remote access claim is added as a frame ancestor together with its office
///   server, but only after the peer registry confirms the peer as trusted
///
/// A missing, malformed or untrusted claim yields no grant. No state is kept
/// between calls; a grant never leaks into another response.
///
/// # Examples
///
/// ```
/// use wopi_trust::{
///     AppConfig, MemoryConfig, PolicyAssembler, PolicyRequest, PolicySupport,
///     StaticFeatures, StaticPeerRegistry, StaticResolver,
/// };
///
/// let store = MemoryConfig::new();
/// let config = AppConfig::new(&store);
/// config.set_app_value("wopi_url", "https://office.example.com:9980/");
///
/// let features = StaticFeatures::new().with_feature("federation");
/// let registry = StaticPeerRegistry::new().with_peer("nc-peer.org", true);
/// let resolver = StaticResolver::new().with_url("nc-peer.org", "https://office.nc-peer.org");
/// let assembler = PolicyAssembler::new(config, &features, &registry, &resolver);
///
/// let mut request = PolicyRequest::new("req-1");
/// request.set_path_info("/apps/files/");
/// request.add_query_param("officeonline_remote_access", "nc-peer.org");
///
/// let policy = assembler.assemble(&request, PolicySupport::FULL).unwrap();
/// assert_eq!(
///     policy.frame_ancestors(),
///     ["'self'", "https://office.example.com:9980", "nc-peer.org", "https://office.nc-peer.org"]
/// );
/// assert_eq!(policy.form_actions(), ["https://office.example.com:9980"]);
/// ```
#[derive(Clone, Copy)]
pub struct PolicyAssembler<'a> {
    config: AppConfig<'a>,
    features: &'a dyn FeatureCheck,
    registry: &'a dyn PeerRegistry,
    resolver: &'a dyn RemoteUrlResolver,
    failure_mode: GrantFailureMode,
}

impl<'a> PolicyAssembler<'a> {
    /// Creates an assembler that denies grants for unresolvable peers.
    pub fn new(
        config: AppConfig<'a>,
        features: &'a dyn FeatureCheck,
        registry: &'a dyn PeerRegistry,
        resolver: &'a dyn RemoteUrlResolver,
    ) -> Self {
        Self {
            config,
            features,
            registry,
            resolver,
            failure_mode: GrantFailureMode::default(),
        }
    }

    /// Sets how resolution failures during a dynamic grant are handled.
    pub fn with_failure_mode(mut self, failure_mode: GrantFailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Returns the configured failure mode.
    pub fn failure_mode(&self) -> GrantFailureMode {
        self.failure_mode
    }

    /// Assembles the policy for `request`.
    ///
    /// # Errors
    ///
    /// Returns `Error::PeerUnreachable` only in [`GrantFailureMode::Surface`],
    /// when the claimed peer is trusted but its office server cannot be
    /// resolved.
    pub fn assemble(
        &self,
        request: &PolicyRequest,
        support: PolicySupport,
    ) -> Result<EmbeddingPolicy, Error> {
        let mut builder = PolicyBuilder::new();
        self.apply_static(&mut builder, support);
        self.apply_federation_grant(&mut builder, request)?;
        Ok(builder.build())
    }

    /// Assembles the policy for `request` and hands it to `sink`.
    ///
    /// Nothing reaches the sink when assembly fails.
    ///
    /// # Errors
    ///
    /// See [`assemble`](Self::assemble).
    pub fn apply(&self, request: &PolicyRequest, sink: &dyn PolicySink) -> Result<(), Error> {
        let policy = self.assemble(request, sink.support())?;
        sink.add_policy(policy);
        Ok(())
    }

    fn apply_static(&self, builder: &mut PolicyBuilder, support: PolicySupport) {
        let url = self.config.public_url();
        if url.trim().is_empty() {
            return;
        }

        builder.allow_frame_ancestor(SELF);
        if let Some(domain) = TrustedDomain::parse(&url) {
            builder.allow_frame_ancestor(domain.as_str());
            if support.form_action {
                builder.allow_form_action(domain.as_str());
            }
        }
    }

    fn apply_federation_grant(
        &self,
        builder: &mut PolicyBuilder,
        request: &PolicyRequest,
    ) -> Result<(), Error> {
        let Some(claim) = request.remote_access_claim() else {
            return Ok(());
        };
        let log = request.log();
        if !request.is_federated_editing() {
            log.debug(format_args!(
                "ignoring remote access claim outside {}",
                FEDERATED_EDITING_PREFIX
            ));
            return Ok(());
        }
        if !self
            .features
            .is_enabled_for_actor(FEDERATION_FEATURE, request.actor())
        {
            log.debug(format_args!("federation not enabled, ignoring remote access claim"));
            return Ok(());
        }

        let peer = match claim.verify(self.registry) {
            Ok(peer) => peer.into_inner(),
            Err(rejection) => {
                log.rejected(format_args!("{}", rejection));
                return Ok(());
            }
        };

        let resolved = self.resolver.resolve(&peer).and_then(|url| {
            TrustedDomain::parse(&url).ok_or_else(|| {
                RemoteLookupError::new(peer.as_str(), RemoteLookupErrorKind::InvalidResponse)
            })
        });

        match resolved {
            Ok(office) => {
                builder.allow_frame_ancestor(&peer);
                builder.allow_frame_ancestor(office.as_str());
                log.granted(&peer, Some(office.as_str()));
                Ok(())
            }
            Err(source) => match self.failure_mode {
                GrantFailureMode::Deny => {
                    log.warn(format_args!("no grant for trusted peer '{}': {}", peer, source));
                    Ok(())
                }
                GrantFailureMode::Surface => {
                    log.error(format_args!(
                        "trusted peer '{}' could not be resolved: {}",
                        peer, source
                    ));
                    Err(Error::PeerUnreachable { peer, source })
                }
            },
        }
    }
}
