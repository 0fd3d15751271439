use std::fmt;

/// A request-scoped logger for trust decisions.
///
/// `TrustLog` is obtained from [`PolicyRequest::log`](crate::PolicyRequest::log)
/// and is lifetime-bound to the request. Every event carries the request id,
/// so grants and denials can be traced back to the response they shaped.
#[derive(Debug, Clone, Copy)]
pub struct TrustLog<'a> {
    request_id: &'a str,
}

impl<'a> TrustLog<'a> {
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Records a dynamic grant for a confirmed peer.
    pub fn granted(&self, peer: &str, office_domain: Option<&str>) {
        tracing::info!(
            request_id = %self.request_id,
            peer = %peer,
            office_domain = office_domain.unwrap_or(""),
            "granted frame-ancestors to federated peer"
        );
    }

    /// Records a claim that did not lead to a grant.
    pub fn rejected(&self, reason: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "remote access claim rejected: {}", reason);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs an error-level message with request ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}
