//! Session-to-view translation layer.
//!
//! The [`Bridge`] wraps the low-level
//! [`hopeconnect_client::ChatSession`] and adapts it to the view
//! lifecycle.
//!
//! # Responsibilities
//!
//! - Feeds view intents and transport notifications into the session
//!   as [`hopeconnect_client::SessionEvent`]s.
//! - Accumulates I/O the session requested (frames, dial, history
//!   fetch) as [`IoRequest`]s for the driver's next cycle.
//! - Converts session actions back into [`crate::ViewEvent`]s,
//!   snapshotting the observable session state for the view.

use hopeconnect_client::{
    ChatSession, SessionAction, SessionEvent,
    wire::ClientFrame,
};
use hopeconnect_core::{Environment, MessageOrigin, SessionContext, UserId};

use crate::{
    ViewEvent,
    state::{SessionSnapshot, TranscriptEntry},
};

/// I/O the session requested, drained by the runtime each cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum IoRequest {
    /// Open the transport.
    Dial,
    /// Emit a frame on the socket.
    SendFrame(ClientFrame),
    /// Fetch the prior message log for the conversation pair.
    FetchHistory {
        /// The local user.
        self_id: UserId,
        /// The resolved counterpart.
        other_id: UserId,
    },
    /// Release the transport.
    HangUp,
}

/// Bridge between the view and the chat session.
///
/// Generic over [`Environment`] so the same code runs in production
/// and in deterministic tests.
pub struct Bridge<E: Environment> {
    session: ChatSession<E>,
    self_id: UserId,
    io: Vec<IoRequest>,
}

impl<E: Environment> Bridge<E> {
    /// Create a bridge around a fresh session for the given context.
    pub fn new(env: E, ctx: SessionContext) -> Self {
        let self_id = ctx.me.id.clone();
        Self { session: ChatSession::new(env, ctx), self_id, io: Vec::new() }
    }

    /// Mount the session. Call once when the chat screen opens.
    pub fn mount(&mut self) -> Vec<ViewEvent> {
        self.feed(SessionEvent::Mount)
    }

    /// Submit a draft from the view.
    pub fn submit(&mut self, body: String) -> Vec<ViewEvent> {
        self.feed(SessionEvent::Submit { body })
    }

    /// Tear the session down. Call on every exit path; idempotent.
    pub fn teardown(&mut self) -> Vec<ViewEvent> {
        self.feed(SessionEvent::Teardown)
    }

    /// Feed a transport or history notification into the session.
    pub fn handle_session_event(&mut self, event: SessionEvent) -> Vec<ViewEvent> {
        self.feed(event)
    }

    /// Take pending I/O requests.
    pub fn take_io(&mut self) -> Vec<IoRequest> {
        std::mem::take(&mut self.io)
    }

    /// Snapshot the session's observable state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        let transcript = self
            .session
            .messages()
            .iter()
            .map(|m| TranscriptEntry {
                mine: m.sender_id == self.self_id,
                body: m.body.clone(),
                pending: m.origin == MessageOrigin::LocalPending,
                sent_at_millis: m.sent_at_millis,
            })
            .collect();

        SessionSnapshot {
            connection: self.session.connection_state(),
            ready: self.session.ready(),
            can_send: self.session.can_send(),
            counterpart_name: self.session.counterpart().map(|p| p.display_name.clone()),
            transcript,
        }
    }

    fn feed(&mut self, event: SessionEvent) -> Vec<ViewEvent> {
        let actions = self.session.handle(event);
        let mut events = Vec::new();
        let mut snapshot_pending = false;

        for action in actions {
            match action {
                SessionAction::Dial => self.io.push(IoRequest::Dial),
                SessionAction::Send(frame) => self.io.push(IoRequest::SendFrame(frame)),
                SessionAction::FetchHistory { self_id, other_id } => {
                    self.io.push(IoRequest::FetchHistory { self_id, other_id });
                },
                SessionAction::HangUp => self.io.push(IoRequest::HangUp),
                SessionAction::Redirect(redirect) => {
                    events.push(ViewEvent::RedirectRequested(redirect));
                },
                SessionAction::Render => snapshot_pending = true,
                SessionAction::Log { message } => {
                    tracing::debug!(%message, "session log");
                },
            }
        }

        // One snapshot per batch, after all mutations from this event.
        if snapshot_pending {
            events.push(ViewEvent::SessionChanged(self.snapshot()));
        }

        events
    }
}
