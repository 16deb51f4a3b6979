//! Chat session state machine for the Hope Connect client.
//!
//! [`ChatSession`] composes the core pieces (counterpart policy,
//! connection lifecycle, message store) into one sans-IO state machine:
//! it consumes [`SessionEvent`]s and returns [`SessionAction`]s for a
//! driver to execute. The wire format, history REST call, and the
//! WebSocket transport (behind the `transport` feature) live here too;
//! protocol logic never touches a socket directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod event;
pub mod history;
mod session;
#[cfg(feature = "transport")]
pub mod transport;
pub mod wire;

pub use event::{Redirect, SessionAction, SessionEvent};
pub use history::HistoryApi;
pub use session::ChatSession;
