//! Trusted-domain resolution and embedding-policy assembly for WOPI-style
//! office integrations.
//!
//! The crate answers two questions for a host that delegates document editing
//! to a remote office server:
//! - **Which origins are trusted?** [`TrustEngine::compute_trust_set`] merges the
//!   local office server, trusted federation peers (and their office servers)
//!   and the global-scale host list into one deduplicated [`TrustSet`].
//! - **What may embed this response?** [`TrustEngine::assemble_policy`] builds an
//!   [`EmbeddingPolicy`] from the local office server and, for federated editing
//!   requests, a per-request grant for a peer confirmed by the trust registry.
//!
//! # Core Types
//!
//! - [`TrustedDomain`]: normalized `scheme://host[:port]` (or `host[:port]`), ASCII only
//! - [`TrustSet`]: the aggregated, deduplicated allow-list
//! - [`EmbeddingPolicy`]: immutable frame-ancestor / form-action policy
//! - [`Tainted<T>`] and [`Verified<T>`]: request input before and after the
//!   registry has vouched for it
//! - [`RemoteAccessClaim`]: request-supplied peer identifier, never trusted by itself
//!
//! # Examples
//!
//! ```
//! use wopi_trust::{
//!     AppConfig, Collaborators, GlobalScaleFlag, MemoryConfig, StaticFeatures,
//!     StaticPeerRegistry, StaticResolver, TrustEngine,
//! };
//!
//! let config = MemoryConfig::new();
//! AppConfig::new(&config).set_app_value("wopi_url", "https://office.example.com:9980/");
//!
//! let features = StaticFeatures::new();
//! let registry = StaticPeerRegistry::new();
//! let resolver = StaticResolver::new();
//! let global_scale = GlobalScaleFlag::disabled();
//!
//! let engine = TrustEngine::new(Collaborators {
//!     config: &config,
//!     features: &features,
//!     registry: &registry,
//!     resolver: &resolver,
//!     global_scale: &global_scale,
//! });
//!
//! let trust_set = engine.compute_trust_set(None);
//! assert_eq!(trust_set.into_vec(), vec!["https://office.example.com:9980".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod assembler;
mod claim;
mod collaborators;
pub mod config;
mod engine;
mod error;
mod logging;
mod normalize;
mod policy;
mod request;
pub mod sources;
mod tainted;
mod verified;

#[cfg(test)]
mod test_utils;

pub use aggregate::{merge_domains, TrustSet};
pub use assembler::{GrantFailureMode, PolicyAssembler};
pub use claim::{ClaimRejection, RemoteAccessClaim};
pub use collaborators::{
    FeatureCheck, GlobalScale, GlobalScaleFlag, PeerRegistry, RemoteUrlResolver, StaticFeatures,
    StaticPeerRegistry, StaticResolver,
};
pub use config::{load_config, AppConfig, ConfigStore, MemoryConfig, SettingValue};
pub use engine::{Collaborators, TrustEngine};
pub use error::{ConfigError, Error, RemoteLookupError, RemoteLookupErrorKind};
pub use logging::TrustLog;
pub use normalize::{domain_only, to_ascii, TrustedDomain};
pub use policy::{EmbeddingPolicy, PolicySink, PolicySupport, RecordingPolicySink};
pub use request::{Actor, PolicyRequest};
pub use tainted::Tainted;
pub use verified::Verified;

/// Application id under which all settings are stored.
pub const APP_ID: &str = "officeonline";

/// Request parameter naming the federation peer that asks for embedding rights.
pub const REMOTE_ACCESS_PARAM: &str = "officeonline_remote_access";

/// Feature that must be enabled for an actor before any federation lookup happens.
pub const FEDERATION_FEATURE: &str = "federation";

/// Path prefix of requests eligible for a dynamic federation grant.
pub const FEDERATED_EDITING_PREFIX: &str = "/apps/files";
