use crate::aggregate::{merge_domains, TrustSet};
use crate::assembler::{GrantFailureMode, PolicyAssembler};
use crate::collaborators::{FeatureCheck, GlobalScale, PeerRegistry, RemoteUrlResolver};
use crate::config::{AppConfig, ConfigStore};
use crate::error::Error;
use crate::policy::{EmbeddingPolicy, PolicySink, PolicySupport};
use crate::request::{Actor, PolicyRequest};
use crate::sources::{FederationTrustSource, GlobalScaleTrustSource, LocalTrustSource};

/// The platform capabilities the engine is built from.
///
/// Every collaborator is injected explicitly; the engine never looks one up.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Key/value configuration store
    pub config: &'a dyn ConfigStore,
    /// Per-actor feature switches
    pub features: &'a dyn FeatureCheck,
    /// Federation peer registry
    pub registry: &'a dyn PeerRegistry,
    /// Peer office-server lookup
    pub resolver: &'a dyn RemoteUrlResolver,
    /// Global-scale switch
    pub global_scale: &'a dyn GlobalScale,
}

/// Entry point tying the trust sources, the aggregator and the policy
/// assembler to one set of collaborators.
///
/// The engine owns no state beyond its collaborator references: every call
/// recomputes from the current configuration and federation state.
///
/// # Examples
///
/// ```
/// use wopi_trust::{
///     Collaborators, GlobalScaleFlag, MemoryConfig, PolicyRequest, PolicySupport,
///     StaticFeatures, StaticPeerRegistry, StaticResolver, TrustEngine,
/// };
///
/// let config = MemoryConfig::new();
/// let features = StaticFeatures::new().with_feature("federation");
/// let registry = StaticPeerRegistry::new().with_peer("https://nc-peer.org", true);
/// let resolver = StaticResolver::new().with_url("https://nc-peer.org", "https://office.nc-peer.org");
/// let global_scale = GlobalScaleFlag::disabled();
///
/// let engine = TrustEngine::new(Collaborators {
///     config: &config,
///     features: &features,
///     registry: &registry,
///     resolver: &resolver,
///     global_scale: &global_scale,
/// });
///
/// assert_eq!(
///     engine.compute_trust_set(None).into_vec(),
///     vec!["https://nc-peer.org", "https://office.nc-peer.org"]
/// );
///
/// let policy = engine
///     .assemble_policy(&PolicyRequest::new("req-1"), PolicySupport::FULL)
///     .unwrap();
/// assert!(policy.frame_ancestors().is_empty());
/// ```
#[derive(Clone, Copy)]
pub struct TrustEngine<'a> {
    collaborators: Collaborators<'a>,
    failure_mode: GrantFailureMode,
}

impl<'a> TrustEngine<'a> {
    /// Creates an engine over `collaborators`, denying dynamic grants whose
    /// peer cannot be resolved.
    pub fn new(collaborators: Collaborators<'a>) -> Self {
        Self {
            collaborators,
            failure_mode: GrantFailureMode::default(),
        }
    }

    /// Sets how resolution failures during a dynamic grant are handled.
    pub fn with_failure_mode(mut self, failure_mode: GrantFailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Returns the typed configuration view.
    pub fn app_config(&self) -> AppConfig<'a> {
        AppConfig::new(self.collaborators.config)
    }

    /// Returns the local office-server source.
    pub fn local_source(&self) -> LocalTrustSource<'a> {
        LocalTrustSource::new(self.app_config())
    }

    /// Returns the federation source.
    pub fn federation_source(&self) -> FederationTrustSource<'a> {
        FederationTrustSource::new(
            self.collaborators.features,
            self.collaborators.registry,
            self.collaborators.resolver,
        )
    }

    /// Returns the global-scale source.
    pub fn global_scale_source(&self) -> GlobalScaleTrustSource<'a> {
        GlobalScaleTrustSource::new(self.collaborators.global_scale, self.app_config())
    }

    /// Computes the trust set for `actor` from the current state of every
    /// source.
    pub fn compute_trust_set(&self, actor: Option<&Actor>) -> TrustSet {
        let local = self.local_source().domain();
        let federation = self.federation_source().domains(actor);
        let global_scale = self.global_scale_source().domains();

        let trust_set = merge_domains(&local, &federation, &global_scale);
        tracing::debug!(
            domains = trust_set.len(),
            federation = federation.len(),
            global_scale = global_scale.len(),
            "computed trust set"
        );
        trust_set
    }

    /// Returns a policy assembler sharing this engine's collaborators.
    pub fn assembler(&self) -> PolicyAssembler<'a> {
        PolicyAssembler::new(
            self.app_config(),
            self.collaborators.features,
            self.collaborators.registry,
            self.collaborators.resolver,
        )
        .with_failure_mode(self.failure_mode)
    }

    /// Assembles the embedding policy for `request`.
    ///
    /// # Errors
    ///
    /// See [`PolicyAssembler::assemble`].
    pub fn assemble_policy(
        &self,
        request: &PolicyRequest,
        support: PolicySupport,
    ) -> Result<EmbeddingPolicy, Error> {
        self.assembler().assemble(request, support)
    }

    /// Assembles the embedding policy for `request` and hands it to `sink`.
    ///
    /// # Errors
    ///
    /// See [`PolicyAssembler::assemble`].
    pub fn apply_policy(&self, request: &PolicyRequest, sink: &dyn PolicySink) -> Result<(), Error> {
        self.assembler().apply(request, sink)
    }
}
