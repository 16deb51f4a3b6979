//! Generic runtime for view orchestration.
//!
//! The Runtime drives the chat screen's event loop, coordinating
//! between:
//! - [`ChatView`]: view state machine
//! - [`Bridge`]: session bridge to the chat client
//! - [`Driver`]: platform-specific I/O

use hopeconnect_client::SessionEvent;
use hopeconnect_core::{Environment, SessionContext};

use crate::{Bridge, ChatView, Driver, IoRequest, ViewAction, ViewEvent};

/// Generic runtime that orchestrates view, bridge, and driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and correlation-id generation
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    view: ChatView,
    bridge: Bridge<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime for the given session context.
    pub fn new(driver: D, env: E, ctx: SessionContext) -> Self {
        Self { driver, view: ChatView::new(), bridge: Bridge::new(env, ctx) }
    }

    /// Run the chat screen until the user leaves or a redirect fires.
    ///
    /// This is the core orchestration loop that:
    /// 1. Mounts the session and executes its initial I/O
    /// 2. Polls for user input events from the driver
    /// 3. Receives transport notifications shaped as session events
    /// 4. Processes events and actions between view and bridge
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.view)?;

        let events = self.bridge.mount();
        if self.process_view_events(events).await? {
            return Ok(());
        }

        loop {
            if let Some(event) = self.driver.poll_event().await?
                && self.process_view_events(vec![event]).await?
            {
                break;
            }

            if let Some(event) = self.driver.recv_session_event().await {
                let events = self.bridge.handle_session_event(event);
                if self.process_view_events(events).await? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process view events and the actions they produce until the
    /// system settles.
    ///
    /// Returns `true` when the screen should be left (quit or
    /// redirect).
    async fn process_view_events(
        &mut self,
        initial: Vec<ViewEvent>,
    ) -> Result<bool, D::Error> {
        let mut pending = initial;
        let mut leaving = false;

        loop {
            while !pending.is_empty() {
                for event in std::mem::take(&mut pending) {
                    let actions = self.view.handle(event);
                    for action in actions {
                        match action {
                            ViewAction::Render => self.driver.render(&self.view)?,
                            ViewAction::Submit { body } => {
                                pending.extend(self.bridge.submit(body));
                            },
                            ViewAction::Navigate(redirect) => {
                                pending.extend(self.bridge.teardown());
                                self.driver.navigate(redirect);
                                leaving = true;
                            },
                            ViewAction::Quit => {
                                pending.extend(self.bridge.teardown());
                                leaving = true;
                            },
                        }
                    }
                }
            }

            let io_events = self.flush_io().await?;
            if io_events.is_empty() {
                break;
            }
            pending = io_events;
        }

        Ok(leaving)
    }

    /// Execute all I/O the session requested, feeding outcomes back in.
    ///
    /// Transport-level failures become session events (`TransportFailed`,
    /// `TransportDown`) rather than runtime errors; the session decides
    /// how to surface them.
    async fn flush_io(&mut self) -> Result<Vec<ViewEvent>, D::Error> {
        let mut events = Vec::new();

        loop {
            let requests = self.bridge.take_io();
            if requests.is_empty() {
                break;
            }

            for request in requests {
                match request {
                    IoRequest::Dial => {
                        if let Err(e) = self.driver.dial().await {
                            events.extend(self.bridge.handle_session_event(
                                SessionEvent::TransportFailed { reason: e.to_string() },
                            ));
                        }
                    },
                    IoRequest::SendFrame(frame) => {
                        if let Err(e) = self.driver.send_frame(frame).await {
                            events.extend(self.bridge.handle_session_event(
                                SessionEvent::TransportDown { reason: e.to_string() },
                            ));
                        }
                    },
                    IoRequest::FetchHistory { self_id, other_id } => {
                        let event = self.driver.fetch_history(&self_id, &other_id).await;
                        events.extend(self.bridge.handle_session_event(event));
                    },
                    IoRequest::HangUp => self.driver.hang_up(),
                }
            }
        }

        Ok(events)
    }

    /// Get a reference to the view.
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Get a mutable reference to the view.
    pub fn view_mut(&mut self) -> &mut ChatView {
        &mut self.view
    }
}
