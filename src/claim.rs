use std::fmt;

use crate::collaborators::PeerRegistry;
use crate::tainted::Tainted;
use crate::verified::Verified;

/// Longest claim accepted before the registry is even asked.
const MAX_CLAIM_LEN: usize = 2048;

/// A request-supplied identifier naming a federation peer.
///
/// The claim is never trusted by itself. It is only a lookup key: [`verify`]
/// promotes it to a [`Verified<String>`] when the peer registry confirms the
/// peer as trusted.
///
/// [`verify`]: RemoteAccessClaim::verify
///
/// # Examples
///
/// ```
/// use wopi_trust::{ClaimRejection, RemoteAccessClaim, StaticPeerRegistry, Tainted};
///
/// let registry = StaticPeerRegistry::new().with_peer("nc-peer.org", true);
///
/// let claim = RemoteAccessClaim::new(Tainted::new("nc-peer.org".to_string()));
/// let peer = claim.verify(&registry).expect("trusted peer");
/// assert_eq!(peer.as_ref(), "nc-peer.org");
///
/// let claim = RemoteAccessClaim::new(Tainted::new("evil.org".to_string()));
/// assert_eq!(claim.verify(&registry).unwrap_err(), ClaimRejection::Untrusted);
/// ```
#[derive(Debug, Clone)]
pub struct RemoteAccessClaim {
    peer: Tainted<String>,
}

impl RemoteAccessClaim {
    /// Wraps a raw, untrusted peer identifier.
    pub fn new(peer: Tainted<String>) -> Self {
        Self { peer }
    }

    /// Checks the claim against the peer registry.
    ///
    /// The claim must be usable as a policy source (non-empty, no whitespace,
    /// no directive or list separators, no quotes) and the registry must
    /// report the exact identifier as trusted.
    ///
    /// # Errors
    ///
    /// Returns `ClaimRejection` when the claim is malformed or the peer is not
    /// trusted. Neither is an error for the request; both mean "no grant".
    pub fn verify(self, registry: &dyn PeerRegistry) -> Result<Verified<String>, ClaimRejection> {
        if !is_well_formed(self.peer.peek()) {
            return Err(ClaimRejection::Malformed);
        }
        if !registry.is_trusted(self.peer.peek()) {
            return Err(ClaimRejection::Untrusted);
        }
        Ok(Verified::new_unchecked(self.peer.into_inner()))
    }
}

/// Why a remote access claim did not lead to a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimRejection {
    /// The claim cannot be a policy source.
    Malformed,
    /// The registry does not trust the claimed peer.
    Untrusted,
}

impl fmt::Display for ClaimRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed claim"),
            Self::Untrusted => write!(f, "peer is not trusted"),
        }
    }
}

fn is_well_formed(claim: &str) -> bool {
    !claim.is_empty()
        && claim.len() <= MAX_CLAIM_LEN
        && !claim
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | ',' | '\'' | '"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::StaticPeerRegistry;

    fn claim(raw: &str) -> RemoteAccessClaim {
        RemoteAccessClaim::new(Tainted::new(raw.to_string()))
    }

    fn registry() -> StaticPeerRegistry {
        StaticPeerRegistry::new()
            .with_peer("nc-peer.org", true)
            .with_peer("https://pending.org", false)
    }

    #[test]
    fn trusted_claim_is_verified() {
        let verified = claim("nc-peer.org").verify(&registry()).unwrap();
        assert_eq!(verified.into_inner(), "nc-peer.org");
    }

    #[test]
    fn registered_but_untrusted_claim_is_rejected() {
        let result = claim("https://pending.org").verify(&registry());
        assert_eq!(result.unwrap_err(), ClaimRejection::Untrusted);
    }

    #[test]
    fn unknown_claim_is_rejected() {
        let result = claim("evil.org").verify(&registry());
        assert_eq!(result.unwrap_err(), ClaimRejection::Untrusted);
    }

    #[test]
    fn malformed_claims_never_reach_registry() {
        // Even a registry trusting these exact strings cannot promote them.
        let registry = StaticPeerRegistry::new()
            .with_peer("", true)
            .with_peer("nc-peer.org; script-src *", true)
            .with_peer("nc-peer.org 'unsafe-inline'", true);

        for raw in ["", "nc-peer.org; script-src *", "nc-peer.org 'unsafe-inline'"] {
            assert_eq!(
                claim(raw).verify(&registry).unwrap_err(),
                ClaimRejection::Malformed,
                "claim {:?} should be malformed",
                raw
            );
        }
    }

    #[test]
    fn overlong_claim_is_malformed() {
        let raw = "a".repeat(MAX_CLAIM_LEN + 1);
        let registry = StaticPeerRegistry::new().with_peer(raw.clone(), true);
        assert_eq!(claim(&raw).verify(&registry).unwrap_err(), ClaimRejection::Malformed);
    }

    #[test]
    fn claim_is_matched_exactly() {
        // No normalization before lookup: the registry decides on the raw value.
        let result = claim("NC-PEER.org").verify(&registry());
        assert_eq!(result.unwrap_err(), ClaimRejection::Untrusted);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a claim the registry does not trust is never verified
            #[test]
            fn proptest_untrusted_claims_never_verify(raw in "\\PC{0,40}") {
                let registry = StaticPeerRegistry::new()
                    .with_peer(raw.clone(), false)
                    .with_peer("nc-peer.org", true);
                prop_assume!(raw != "nc-peer.org");

                prop_assert!(claim(&raw).verify(&registry).is_err());
            }
        }
    }
}
