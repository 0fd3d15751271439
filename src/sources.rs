//! Trust sources feeding the domain list aggregator.
//!
//! Each source answers independently and never fails: a source that is not
//! configured or not enabled yields nothing.
//!
//! - `LocalTrustSource`: the configured office server
//! - `FederationTrustSource`: trusted federation peers and their office servers
//! - `GlobalScaleTrustSource`: the global-scale trusted host list

mod federation;
mod global_scale;
mod local;

pub use federation::FederationTrustSource;
pub use global_scale::GlobalScaleTrustSource;
pub use local::LocalTrustSource;
