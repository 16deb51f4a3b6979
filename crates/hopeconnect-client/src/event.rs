//! Session events and actions.

use hopeconnect_core::UserId;

use crate::wire::{ClientFrame, InboundEnvelope, WireMessage};

/// Events the driver feeds into the session state machine.
///
/// The driver is responsible for:
/// - Receiving socket events and forwarding them here
/// - Running the history fetch and reporting its outcome
/// - Forwarding view lifecycle (mount, submit, teardown)
///
/// All events arrive on the view's single event loop; no two are ever
/// processed concurrently.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The chat view mounted.
    Mount,

    /// The transport dial completed.
    TransportUp,

    /// The transport library re-established a dropped connection on
    /// its own (no custom backoff exists on our side).
    TransportReestablished,

    /// The dial failed (`connect_error`).
    TransportFailed {
        /// Transport-reported reason.
        reason: String,
    },

    /// An established transport dropped (`disconnect`).
    TransportDown {
        /// Transport-reported reason.
        reason: String,
    },

    /// A `receive_message` event arrived.
    EnvelopeReceived(InboundEnvelope),

    /// The history fetch resolved.
    HistoryLoaded(Vec<WireMessage>),

    /// The history fetch failed (network error or non-2xx). The
    /// conversation degrades to an empty backlog, never an error view.
    HistoryFailed {
        /// What went wrong, for the log only.
        reason: String,
    },

    /// The user submitted a draft.
    Submit {
        /// Raw draft text; trimmed and validated here.
        body: String,
    },

    /// The view is unmounting (navigation away, logout). Must arrive on
    /// every exit path; processed idempotently.
    Teardown,
}

/// Where a session without a usable counterpart sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Neutral landing view (victim without an assignment, missing
    /// identity, admin).
    Dashboard,
    /// The counselor's client list, to pick a conversation partner.
    ClientList,
}

/// Actions the session produces for the driver to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Open the transport to the configured messaging endpoint.
    Dial,

    /// Emit a frame on the socket.
    Send(ClientFrame),

    /// Fetch the prior message log for the conversation pair, then
    /// feed back `HistoryLoaded` or `HistoryFailed`.
    FetchHistory {
        /// The local user.
        self_id: UserId,
        /// The resolved counterpart.
        other_id: UserId,
    },

    /// Leave the chat view; it cannot function with this context.
    Redirect(Redirect),

    /// Release the transport. Emitted once, at teardown.
    HangUp,

    /// Observable state changed; re-render.
    Render,

    /// Diagnostic message for the driver's logger.
    Log {
        /// Log message.
        message: String,
    },
}
