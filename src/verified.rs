/// A value that the trust registry has vouched for.
///
/// `Verified<T>` is the counterpart of [`Tainted<T>`](crate::Tainted): a claimed
/// peer identifier becomes `Verified<String>` only after the peer registry has
/// confirmed it as currently trusted. Only verified peers can reach an
/// [`EmbeddingPolicy`](crate::EmbeddingPolicy) through the dynamic grant.
///
/// # Construction Invariants
///
/// There is no public constructor and no `From<T>` implementation. Construction
/// goes through `new_unchecked`, which is `pub(crate)` and only called after
/// the registry check succeeded.
///
/// ```compile_fail
/// use wopi_trust::Verified;
///
/// // This will not compile - no public constructor:
/// let verified = Verified::new("https://nc-peer.org".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Creates a `Verified<T>` without performing validation.
    ///
    /// Callers must have checked the value against the peer registry.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the `Verified<T>` and returns the inner value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
