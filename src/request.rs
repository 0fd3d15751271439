use std::collections::HashMap;

use crate::claim::RemoteAccessClaim;
use crate::logging::TrustLog;
use crate::tainted::Tainted;
use crate::{FEDERATED_EDITING_PREFIX, REMOTE_ACCESS_PARAM};

/// The user or service on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Unique identifier for this actor
    pub id: String,
    /// Display name
    pub name: String,
}

/// The parts of an inbound request the policy assembler looks at.
///
/// `PolicyRequest` holds simple owned data so it stays independent of any web
/// framework; integrations fill it from their own request type. Query
/// parameters only leave it wrapped in [`Tainted<T>`].
///
/// # Examples
///
/// ```
/// use wopi_trust::PolicyRequest;
///
/// let mut request = PolicyRequest::new("req-1");
/// request.set_path_info("/apps/files/");
/// request.add_query_param("officeonline_remote_access", "nc-peer.org");
///
/// assert!(request.is_federated_editing());
/// assert!(request.remote_access_claim().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRequest {
    request_id: String,
    actor: Option<Actor>,
    path_info: String,
    query_params: HashMap<String, String>,
}

impl PolicyRequest {
    /// Creates a request with the given id, no actor, an empty path and no
    /// parameters.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            actor: None,
            path_info: String::new(),
            query_params: HashMap::new(),
        }
    }

    /// Sets the actor the request runs as.
    pub fn set_actor(&mut self, actor: Option<Actor>) {
        self.actor = actor;
    }

    /// Sets the request path (without query string).
    pub fn set_path_info(&mut self, path_info: impl Into<String>) {
        self.path_info = path_info.into();
    }

    /// Adds a query parameter. Values are treated as untrusted.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the actor, if any.
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Returns the request path.
    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    /// Returns a query parameter wrapped as untrusted input.
    pub fn tainted_param(&self, key: &str) -> Option<Tainted<String>> {
        self.query_params.get(key).cloned().map(Tainted::new)
    }

    /// Returns `true` if the path is eligible for a dynamic federation grant.
    pub fn is_federated_editing(&self) -> bool {
        self.path_info.starts_with(FEDERATED_EDITING_PREFIX)
    }

    /// Extracts the remote access claim, if the request carries one.
    pub fn remote_access_claim(&self) -> Option<RemoteAccessClaim> {
        self.tainted_param(REMOTE_ACCESS_PARAM)
            .map(RemoteAccessClaim::new)
    }

    /// Returns a logger that tags every event with this request's id.
    pub fn log(&self) -> TrustLog<'_> {
        TrustLog::new(&self.request_id)
    }
}
