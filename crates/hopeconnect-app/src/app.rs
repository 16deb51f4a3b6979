//! View state machine.
//!
//! This module defines the [`ChatView`] state machine, which manages
//! the interactive state of the chat screen completely decoupled from
//! I/O and session mechanics.
//!
//! This is a pure state machine: it consumes [`crate::ViewEvent`]
//! inputs and produces [`crate::ViewAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the draft input (trim-on-send, clear-after-send).
//! - Derives the send affordance: enabled only when the session can
//!   send and the trimmed draft is non-empty.
//! - Exposes the loading affordance, connectivity banner, and
//!   transcript snapshot for rendering.

use crate::{
    ViewAction, ViewEvent,
    state::{Banner, SessionSnapshot, TranscriptEntry},
};

/// Chat view state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable without a session or socket.
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    /// Current draft input.
    draft: String,
    /// Latest session snapshot.
    snapshot: SessionSnapshot,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Set once a redirect fires; the view is inert afterwards.
    departed: bool,
}

impl ChatView {
    /// Create a view in its initial loading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: ViewEvent) -> Vec<ViewAction> {
        if self.departed {
            return vec![];
        }

        match event {
            ViewEvent::DraftChanged(draft) => {
                self.draft = draft;
                vec![ViewAction::Render]
            },
            ViewEvent::SubmitPressed => {
                if !self.send_enabled() {
                    return vec![];
                }
                let body = std::mem::take(&mut self.draft);
                vec![ViewAction::Submit { body }, ViewAction::Render]
            },
            ViewEvent::LeaveRequested => {
                self.departed = true;
                vec![ViewAction::Quit]
            },
            ViewEvent::SessionChanged(snapshot) => {
                self.snapshot = snapshot;
                vec![ViewAction::Render]
            },
            ViewEvent::RedirectRequested(redirect) => {
                self.departed = true;
                vec![ViewAction::Navigate(redirect)]
            },
            ViewEvent::StatusMessage(message) => {
                self.status_message = Some(message);
                vec![ViewAction::Render]
            },
        }
    }

    /// Current draft input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// True when pressing send would submit.
    pub fn send_enabled(&self) -> bool {
        self.snapshot.can_send && !self.draft.trim().is_empty()
    }

    /// True while history is still unresolved.
    pub fn loading(&self) -> bool {
        !self.snapshot.ready && !self.departed
    }

    /// Connectivity banner for the header.
    pub fn banner(&self) -> Banner {
        Banner::from_connection(self.snapshot.connection)
    }

    /// Counterpart display name, once resolved.
    pub fn counterpart_name(&self) -> Option<&str> {
        self.snapshot.counterpart_name.as_deref()
    }

    /// The transcript, oldest first.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.snapshot.transcript
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
