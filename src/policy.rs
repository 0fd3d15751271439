use std::cell::RefCell;
use std::fmt;

/// CSP keyword allowing same-origin embedding.
pub(crate) const SELF: &str = "'self'";

/// What a policy mechanism is able to restrict.
///
/// Older mechanisms cannot restrict form targets; the assembler then leaves
/// form-action grants out instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySupport {
    /// Whether `form-action` restrictions are understood.
    pub form_action: bool,
}

impl PolicySupport {
    /// Frame-ancestor and form-action restrictions.
    pub const FULL: Self = Self { form_action: true };

    /// Frame-ancestor restrictions only.
    pub const FRAME_ANCESTORS_ONLY: Self = Self { form_action: false };
}

impl Default for PolicySupport {
    fn default() -> Self {
        Self::FULL
    }
}

/// Origins allowed to embed a response and to receive its form submissions.
///
/// Built once per response by the [`PolicyAssembler`](crate::PolicyAssembler)
/// and never mutated afterwards. Entries keep insertion order and appear once.
///
/// # Examples
///
/// ```
/// use wopi_trust::EmbeddingPolicy;
///
/// let policy = EmbeddingPolicy::default();
/// assert!(policy.frame_ancestors().is_empty());
/// assert_eq!(policy.header_value(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingPolicy {
    frame_ancestors: Vec<String>,
    form_actions: Vec<String>,
}

impl EmbeddingPolicy {
    /// Returns the allowed frame ancestors.
    pub fn frame_ancestors(&self) -> &[String] {
        &self.frame_ancestors
    }

    /// Returns the allowed form-action targets.
    pub fn form_actions(&self) -> &[String] {
        &self.form_actions
    }

    /// Returns `true` if `source` may embed the response.
    pub fn allows_frame_ancestor(&self, source: &str) -> bool {
        self.frame_ancestors.iter().any(|s| s == source)
    }

    /// Returns `true` if forms may be submitted to `source`.
    pub fn allows_form_action(&self, source: &str) -> bool {
        self.form_actions.iter().any(|s| s == source)
    }

    /// Renders the policy as Content-Security-Policy directives.
    ///
    /// Empty directives are omitted.
    pub fn header_value(&self) -> String {
        let mut directives = Vec::new();
        if !self.frame_ancestors.is_empty() {
            directives.push(format!("frame-ancestors {}", self.frame_ancestors.join(" ")));
        }
        if !self.form_actions.is_empty() {
            directives.push(format!("form-action {}", self.form_actions.join(" ")));
        }
        directives.join("; ")
    }
}

impl fmt::Display for EmbeddingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}

/// Accumulates entries for one response before freezing them.
#[derive(Debug, Default)]
pub(crate) struct PolicyBuilder {
    policy: EmbeddingPolicy,
}

impl PolicyBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allow_frame_ancestor(&mut self, source: &str) {
        push_unique(&mut self.policy.frame_ancestors, source);
    }

    pub(crate) fn allow_form_action(&mut self, source: &str) {
        push_unique(&mut self.policy.form_actions, source);
    }

    pub(crate) fn build(self) -> EmbeddingPolicy {
        self.policy
    }
}

fn push_unique(entries: &mut Vec<String>, source: &str) {
    if !source.is_empty() && !entries.iter().any(|e| e == source) {
        entries.push(source.to_string());
    }
}

/// Receives the assembled policy for a response.
pub trait PolicySink {
    /// Returns what the sink's policy mechanism can restrict.
    fn support(&self) -> PolicySupport;

    /// Adds a policy to the response. Called once per response.
    fn add_policy(&self, policy: EmbeddingPolicy);
}

/// A sink that collects policies in memory.
///
/// Uses interior mutability so it can be shared by reference while recording.
///
/// # Examples
///
/// ```
/// use wopi_trust::{EmbeddingPolicy, PolicySink, PolicySupport, RecordingPolicySink};
///
/// let sink = RecordingPolicySink::new(PolicySupport::FULL);
/// sink.add_policy(EmbeddingPolicy::default());
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug)]
pub struct RecordingPolicySink {
    support: PolicySupport,
    policies: RefCell<Vec<EmbeddingPolicy>>,
}

impl RecordingPolicySink {
    /// Creates an empty sink with the given capabilities.
    pub fn new(support: PolicySupport) -> Self {
        Self {
            support,
            policies: RefCell::new(Vec::new()),
        }
    }

    /// Returns the number of recorded policies.
    pub fn len(&self) -> usize {
        self.policies.borrow().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.policies.borrow().is_empty()
    }

    /// Consumes the sink and returns the recorded policies.
    pub fn into_vec(self) -> Vec<EmbeddingPolicy> {
        self.policies.into_inner()
    }
}

impl Default for RecordingPolicySink {
    fn default() -> Self {
        Self::new(PolicySupport::FULL)
    }
}

impl PolicySink for RecordingPolicySink {
    fn support(&self) -> PolicySupport {
        self.support
    }

    fn add_policy(&self, policy: EmbeddingPolicy) {
        self.policies.borrow_mut().push(policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_deduplicates_and_skips_empty() {
        let mut builder = PolicyBuilder::new();
        builder.allow_frame_ancestor(SELF);
        builder.allow_frame_ancestor("https://office.example.com");
        builder.allow_frame_ancestor(SELF);
        builder.allow_frame_ancestor("");
        builder.allow_form_action("https://office.example.com");
        builder.allow_form_action("https://office.example.com");

        let policy = builder.build();
        assert_eq!(policy.frame_ancestors(), ["'self'", "https://office.example.com"]);
        assert_eq!(policy.form_actions(), ["https://office.example.com"]);
    }

    #[test]
    fn header_value_renders_directives() {
        let mut builder = PolicyBuilder::new();
        builder.allow_frame_ancestor(SELF);
        builder.allow_frame_ancestor("https://office.example.com");
        builder.allow_form_action("https://office.example.com");

        let policy = builder.build();
        assert_eq!(
            policy.header_value(),
            "frame-ancestors 'self' https://office.example.com; form-action https://office.example.com"
        );
        assert_eq!(policy.to_string(), policy.header_value());
    }

    #[test]
    fn header_value_omits_empty_form_action() {
        let mut builder = PolicyBuilder::new();
        builder.allow_frame_ancestor(SELF);

        assert_eq!(builder.build().header_value(), "frame-ancestors 'self'");
    }

    #[test]
    fn allows_checks_exact_entries() {
        let mut builder = PolicyBuilder::new();
        builder.allow_frame_ancestor("https://office.example.com");
        let policy = builder.build();

        assert!(policy.allows_frame_ancestor("https://office.example.com"));
        assert!(!policy.allows_frame_ancestor("https://office.example.com:9980"));
        assert!(!policy.allows_form_action("https://office.example.com"));
    }

    #[test]
    fn recording_sink_keeps_policies() {
        let sink = RecordingPolicySink::new(PolicySupport::FRAME_ANCESTORS_ONLY);
        assert!(sink.is_empty());
        assert!(!sink.support().form_action);

        sink.add_policy(EmbeddingPolicy::default());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.into_vec(), vec![EmbeddingPolicy::default()]);
    }

    #[test]
    fn default_support_is_full() {
        assert_eq!(PolicySupport::default(), PolicySupport::FULL);
        assert!(RecordingPolicySink::default().support().form_action);
    }
}
