//! Observable view state types.
//!
//! These structures serve as the "View Model" for the chat screen. They
//! contain the subset of session state necessary for rendering without
//! exposing the wire or store internals of the underlying client.

use hopeconnect_core::ConnectionState;

/// Connectivity banner shown above the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Counterpart reachable; transport up.
    ActiveNow,
    /// Dial in progress.
    Connecting,
    /// Transport down; the transport library retries on its own.
    Offline,
    /// Dial failed; retrying.
    ConnectionTrouble,
}

impl Banner {
    /// Derive the banner from the session's connection state.
    pub fn from_connection(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Connected => Self::ActiveNow,
            ConnectionState::Connecting => Self::Connecting,
            ConnectionState::Disconnected => Self::Offline,
            ConnectionState::Errored => Self::ConnectionTrouble,
        }
    }
}

/// One rendered transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Authored by the local user (renders on the "own" side).
    pub mine: bool,
    /// Message text.
    pub body: String,
    /// Still awaiting server confirmation.
    pub pending: bool,
    /// Sender-side timestamp, milliseconds since the Unix epoch.
    pub sent_at_millis: u64,
}

/// Snapshot of the session as the view renders it.
///
/// Produced by the bridge after every session mutation; the view never
/// reaches into the session directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Connection state for the banner.
    pub connection: ConnectionState,
    /// History resolved; the loading affordance may come down.
    pub ready: bool,
    /// A submit would reach the transport.
    pub can_send: bool,
    /// Counterpart display name for the header, once resolved.
    pub counterpart_name: Option<String>,
    /// The conversation, oldest first.
    pub transcript: Vec<TranscriptEntry>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            ready: false,
            can_send: false,
            counterpart_name: None,
            transcript: Vec::new(),
        }
    }
}
