//! Identity and session context types.
//!
//! The backend assigns every identity; the client never mutates one.
//! [`SessionContext`] is the explicit replacement for the original
//! client's ambient browser-storage reads: everything the chat core
//! needs (auth token, cached assignment, navigation target) is handed
//! to it at construction, which keeps the core testable with in-memory
//! fakes.

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
///
/// The wire sometimes carries the id as a bare string and sometimes as
/// an expanded participant record; both normalize to this type. The id
/// comparison that echo suppression depends on happens here, exactly
/// once, case-sensitively on the trimmed string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a normalized id from any string-ish input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    /// The bare id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id is empty after normalization.
    ///
    /// An empty self id is a configuration error: the session refuses
    /// to open a transport for it.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for UserId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Account role, assigned by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A client of the service, paired with one assigned counselor.
    Victim,
    /// A counselor, chatting with any of their assigned clients.
    Counselor,
    /// Administrative account; has no chat capability.
    Admin,
}

/// A chat participant as the server describes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Human-readable name for rendering.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Account role.
    pub role: Role,
}

/// Everything the chat core consumes from the surrounding application.
///
/// Populated once at view entry from login state and navigation; the
/// core only ever reads it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The signed-in user.
    pub me: Participant,
    /// Bearer token for REST calls.
    pub auth_token: String,
    /// Counterpart attached to the navigation that opened the view,
    /// if any. Takes priority over the cached assignment.
    pub nav_counterpart: Option<Participant>,
    /// Assigned counselor cached at login. Only meaningful for
    /// victim-role users; `None` when no assignment exists yet.
    pub assigned_counselor: Option<Participant>,
}

impl SessionContext {
    /// Context for a user entering chat without navigation state.
    pub fn new(me: Participant, auth_token: impl Into<String>) -> Self {
        Self { me, auth_token: auth_token.into(), nav_counterpart: None, assigned_counselor: None }
    }

    /// Attach an explicit navigation counterpart.
    #[must_use]
    pub fn with_nav_counterpart(mut self, counterpart: Participant) -> Self {
        self.nav_counterpart = Some(counterpart);
        self
    }

    /// Attach the cached assigned-counselor record.
    #[must_use]
    pub fn with_assigned_counselor(mut self, counselor: Participant) -> Self {
        self.assigned_counselor = Some(counselor);
        self
    }
}
