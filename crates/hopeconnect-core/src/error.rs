//! Error types for the chat core.
//!
//! Strongly-typed per the spec's taxonomy: configuration errors are
//! fatal to the view only (redirect), transport errors are transient
//! (banner), and neither may escape as a process-level failure.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors from the connection state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Missing or empty identity; the session must redirect instead of
    /// dialing.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was missing.
        reason: String,
    },

    /// Invalid state transition attempted.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when the error occurred.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Underlying transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ConnectionError {
    /// True if this error is transient and may clear on its own.
    ///
    /// Transport failures are transient: the transport library owns
    /// reconnection and the UI shows a banner meanwhile. Configuration
    /// and state-machine misuse never clear by waiting.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionError;
    use crate::connection::ConnectionState;

    #[test]
    fn transport_errors_are_transient() {
        assert!(ConnectionError::Transport("socket reset".to_owned()).is_transient());
    }

    #[test]
    fn configuration_errors_are_not() {
        assert!(
            !ConnectionError::Configuration { reason: "empty self id".to_owned() }.is_transient()
        );
        assert!(
            !ConnectionError::InvalidState {
                state: ConnectionState::Connected,
                operation: "open",
            }
            .is_transient()
        );
    }
}
