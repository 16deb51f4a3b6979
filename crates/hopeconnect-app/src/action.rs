//! View side-effects and intents.
//!
//! This module defines the [`ViewAction`] enum, which represents
//! instructions produced by the [`crate::ChatView`] state machine for
//! the runtime to execute.

use hopeconnect_client::Redirect;

/// Actions produced by the view state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Render the view.
    Render,

    /// Submit a draft to the session.
    Submit {
        /// Draft text as entered; the session trims and validates.
        body: String,
    },

    /// Navigate off the chat screen.
    Navigate(Redirect),

    /// Tear down the session and leave.
    Quit,
}
