use std::fmt;

/// A wrapper for request-supplied data that must not be trusted as-is.
///
/// `Tainted<T>` marks values that crossed the request boundary (query
/// parameters, claimed peer identifiers). The value is only reachable from
/// inside this crate, where it is checked against the peer registry before
/// being promoted to [`Verified<T>`](crate::Verified).
///
/// # Security Properties
///
/// - Does NOT implement `Deref` or any implicit conversion traits
/// - Inner value is inaccessible outside the crate
///
/// # Examples
///
/// ```
/// use wopi_trust::Tainted;
///
/// let claimed_peer = Tainted::new("https://nc-peer.org".to_string());
///
/// // Debug output shows it's tainted
/// assert!(format!("{:?}", claimed_peer).starts_with("Tainted"));
///
/// // But the value cannot be used directly:
/// // let peer: String = claimed_peer; // Won't compile!
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private: external code goes through the registry check.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value in `Tainted`.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the inner value for validation.
    ///
    /// `pub(crate)`: only the claim check may look inside.
    pub(crate) fn peek(&self) -> &T {
        &self.inner
    }

    /// Extracts the inner value for validation.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

// No Deref, AsRef, Borrow, From<T> or Into<T>: each would let a claimed
// peer reach the policy without the registry check.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
