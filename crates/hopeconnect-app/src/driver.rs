//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the view runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles
//! all orchestration.

use std::future::Future;

use hopeconnect_client::{Redirect, SessionEvent, wire::ClientFrame};
use hopeconnect_core::UserId;

use crate::{ChatView, ViewEvent};

/// Abstracts I/O operations for the view runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic, so the
/// same orchestration code runs in production and in deterministic
/// tests.
///
/// # Implementations
///
/// - **Production**: WebSocket transport plus the REST history client
///   behind `hopeconnect-client`'s `transport` feature.
/// - **Tests**: in-memory queues of scripted events.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user input event.
    ///
    /// Returns an event or `None` if no input is ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<ViewEvent>, Self::Error>> + Send;

    /// Open the transport to the messaging endpoint.
    ///
    /// Connectivity outcomes (up, failed, dropped, reestablished) are
    /// reported through [`Driver::recv_session_event`]; the error here
    /// covers only dial attempts that never started.
    ///
    /// # Errors
    ///
    /// Returns an error if the dial could not be initiated.
    fn dial(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a frame to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or send fails.
    fn send_frame(
        &mut self,
        frame: ClientFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receive the next transport notification, already shaped as a
    /// session event (`TransportUp`, `EnvelopeReceived`, ...).
    ///
    /// Returns `None` when nothing is pending.
    fn recv_session_event(&mut self) -> impl Future<Output = Option<SessionEvent>> + Send;

    /// Fetch the prior message log for the conversation pair.
    ///
    /// Always resolves to a session event: `HistoryLoaded` on success,
    /// `HistoryFailed` otherwise. History failures never abort the
    /// runtime.
    fn fetch_history(
        &mut self,
        self_id: &UserId,
        other_id: &UserId,
    ) -> impl Future<Output = SessionEvent> + Send;

    /// Render the view state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &ChatView) -> Result<(), Self::Error>;

    /// Navigate off the chat screen.
    fn navigate(&mut self, redirect: Redirect);

    /// Release the transport and clean up resources.
    fn hang_up(&mut self);
}
