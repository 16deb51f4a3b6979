//! View input events.
//!
//! This module defines [`ViewEvent`], the set of inputs that drive the
//! [`crate::ChatView`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (draft edits, submit, leaving the screen).
//! - Session notifications translated by the [`crate::Bridge`].

use hopeconnect_client::Redirect;

use crate::state::SessionSnapshot;

/// Events processed by the view state machine.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The user edited the draft input.
    DraftChanged(String),

    /// The user pressed send.
    SubmitPressed,

    /// The user is leaving the chat screen.
    LeaveRequested,

    /// The session's observable state changed.
    SessionChanged(SessionSnapshot),

    /// The session cannot function with this context.
    RedirectRequested(Redirect),

    /// Transient status line for the user.
    StatusMessage(String),
}
