use std::collections::HashSet;

use serde::Serialize;

use crate::normalize::TrustedDomain;

/// The aggregated, deduplicated set of trusted domains.
///
/// Keeps first-seen order so output is deterministic. A `TrustSet` is a
/// derived view: recompute it instead of holding on to it, since its inputs
/// can change between calls.
///
/// # Examples
///
/// ```
/// use wopi_trust::merge_domains;
///
/// let set = merge_domains(
///     "https://office.example.com",
///     &["https://office.example.com".to_string(), "".to_string()],
///     &["a.example.com".to_string()],
/// );
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("a.example.com"));
/// assert!(set.allows_url("https://office.example.com/browser/dist/cool.html"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustSet {
    domains: Vec<TrustedDomain>,
}

impl TrustSet {
    /// Returns `true` if `domain` is in the set, compared exactly.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.as_str() == domain)
    }

    /// Returns `true` if the origin of `url` is trusted.
    ///
    /// The URL is normalized first and matches either a `scheme://host[:port]`
    /// entry or a bare `host[:port]` entry (as global-scale hosts are stored).
    pub fn allows_url(&self, url: &str) -> bool {
        let Some(domain) = TrustedDomain::parse(url) else {
            return false;
        };
        let bare = domain
            .as_str()
            .split_once("://")
            .map_or(domain.as_str(), |(_, rest)| rest);
        self.contains(domain.as_str()) || self.contains(bare)
    }

    /// Returns the number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns `true` if nothing is trusted.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterates over the domains in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TrustedDomain> {
        self.domains.iter()
    }

    /// Consumes the set and returns the domains as strings.
    pub fn into_vec(self) -> Vec<String> {
        self.domains
            .into_iter()
            .map(TrustedDomain::into_string)
            .collect()
    }
}

impl IntoIterator for TrustSet {
    type Item = TrustedDomain;
    type IntoIter = std::vec::IntoIter<TrustedDomain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.into_iter()
    }
}

/// Merges the three trust sources into one [`TrustSet`].
///
/// Entries are taken in order (local, federation, global scale), converted to
/// ASCII, stripped of empty values and deduplicated, first occurrence wins.
/// This is a pure function of its inputs.
pub fn merge_domains(local: &str, federation: &[String], global_scale: &[String]) -> TrustSet {
    let mut seen = HashSet::new();
    let domains = std::iter::once(local)
        .chain(federation.iter().map(String::as_str))
        .chain(global_scale.iter().map(String::as_str))
        .filter_map(TrustedDomain::from_entry)
        .filter(|domain| seen.insert(domain.clone()))
        .collect();

    TrustSet { domains }
}
