//! Connection lifecycle state machine.
//!
//! Owns the transport connection state for one mounted chat view and
//! nothing else. Uses the action pattern: methods mutate state and
//! return actions for the driver to execute, so the machine stays pure
//! and directly testable without a socket.
//!
//! # State machine
//!
//! ```text
//! ┌──────────────┐  open   ┌────────────┐  established  ┌───────────┐
//! │ Disconnected │────────>│ Connecting │──────────────>│ Connected │
//! └──────────────┘         └────────────┘               └───────────┘
//!        ^                       │ failed                     │ dropped
//!        │ close (any state)     ↓                            ↓
//!        │                  ┌─────────┐                ┌──────────────┐
//!        └──────────────────│ Errored │                │ Disconnected │
//!                           └─────────┘                └──────────────┘
//! ```
//!
//! Reconnection is the transport library's concern; this machine only
//! reports what happened. Late transport callbacks after `close()` are
//! absorbed as no-ops so a torn-down view is never mutated.

use crate::{error::ConnectionError, session::UserId};

/// Connectivity as the rest of the session observes it, read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport. Initial state, after a clean close, or after a
    /// server-initiated drop.
    Disconnected,
    /// Dial in progress, identity not yet announced.
    Connecting,
    /// Transport up and identity announced; sends are allowed.
    Connected,
    /// Dial failed. Transient; surfaced as a banner, never fatal.
    Errored,
}

/// Actions returned by the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open the transport to the configured messaging endpoint.
    Dial,

    /// Announce this user's identity so the server routes messages
    /// addressed to them onto this transport session. Sent exactly
    /// once per establishment.
    Announce {
        /// The local user's id.
        user_id: UserId,
    },
}

/// Connection lifecycle state machine for a single chat view.
#[derive(Debug, Clone)]
pub struct Connection {
    state: ConnectionState,
    /// Identity announced on establishment. Set by `open`, kept across
    /// transient drops so the transport's own reconnect can re-announce.
    self_id: Option<UserId>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Create a connection in [`ConnectionState::Disconnected`].
    pub fn new() -> Self {
        Self { state: ConnectionState::Disconnected, self_id: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True when sends may reach the transport.
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Begin connecting on behalf of `self_id`.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Configuration` if the id is empty
    /// - `ConnectionError::InvalidState` if already connecting or
    ///   connected
    pub fn open(&mut self, self_id: UserId) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self_id.is_empty() {
            return Err(ConnectionError::Configuration {
                reason: "cannot open a connection without a self id".to_owned(),
            });
        }

        match self.state {
            ConnectionState::Disconnected | ConnectionState::Errored => {
                self.state = ConnectionState::Connecting;
                self.self_id = Some(self_id);
                Ok(vec![ConnectionAction::Dial])
            },
            state => Err(ConnectionError::InvalidState { state, operation: "open" }),
        }
    }

    /// The transport reported that the dial completed.
    ///
    /// Returns the identity announcement for the driver to emit. A
    /// late callback after `close()` returns nothing.
    pub fn established(&mut self) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connecting {
            return vec![];
        }

        match &self.self_id {
            Some(user_id) => {
                self.state = ConnectionState::Connected;
                vec![ConnectionAction::Announce { user_id: user_id.clone() }]
            },
            // open() always sets self_id before Connecting; treat the
            // impossible case as a drop rather than panicking.
            None => {
                self.state = ConnectionState::Disconnected;
                vec![]
            },
        }
    }

    /// The dial failed (`connect_error`).
    ///
    /// Transient: the caller surfaces a banner and keeps the view
    /// alive. Returns the classification for convenience.
    pub fn failed(&mut self, reason: impl Into<String>) -> ConnectionError {
        if self.state == ConnectionState::Connecting || self.state == ConnectionState::Connected {
            self.state = ConnectionState::Errored;
        }
        ConnectionError::Transport(reason.into())
    }

    /// The server or network dropped an established transport.
    pub fn dropped(&mut self, reason: impl Into<String>) -> ConnectionError {
        if self.state != ConnectionState::Disconnected {
            self.state = ConnectionState::Disconnected;
        }
        ConnectionError::Transport(reason.into())
    }

    /// The transport library re-established the connection on its own.
    ///
    /// Re-announces identity; the server needs the join again for the
    /// new underlying socket.
    pub fn reestablished(&mut self) -> Vec<ConnectionAction> {
        match (&self.state, &self.self_id) {
            (ConnectionState::Disconnected | ConnectionState::Errored, Some(user_id)) => {
                self.state = ConnectionState::Connected;
                vec![ConnectionAction::Announce { user_id: user_id.clone() }]
            },
            _ => vec![],
        }
    }

    /// Release the transport.
    ///
    /// Idempotent: closing an already-closed connection is a no-op.
    /// Clearing the identity guarantees no later callback can revive
    /// the connection.
    pub fn close(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.self_id = None;
    }
}
