//! Chat session state machine.
//!
//! The `ChatSession` is the composition root for one mounted chat
//! view: it resolves the counterpart, drives the connection lifecycle,
//! seeds history, and owns the message store. It is a pure state
//! machine; every failure is converted into a recoverable action
//! (redirect, banner, empty history) at this boundary, and nothing
//! propagates to the rendering layer uncaught.
//!
//! Lifecycle: `Mount` resolves participants and dials, `TransportUp`
//! announces identity and starts the one-shot history fetch, `Submit`
//! and `EnvelopeReceived` feed the store, `Teardown` releases the
//! transport. Events arriving after teardown are safe no-ops, so a
//! late fetch or socket callback can never mutate a dead view.

use hopeconnect_core::{
    Connection, ConnectionAction, ConnectionState, CounterpartResolution, Environment,
    Message, MessageStore, Participant, ReceiveOutcome, SessionContext, resolve_counterpart,
};

use crate::{
    event::{Redirect, SessionAction, SessionEvent},
    wire::{ClientFrame, InboundEnvelope, OutboundMessage, WireMessage},
};

/// Where the session is in its mount/teardown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Constructed, not yet mounted.
    Unmounted,
    /// Mounted with a resolved counterpart.
    Active,
    /// Torn down or redirected away; all further events are no-ops.
    Closed,
}

/// State machine for one mounted chat view.
///
/// The session exclusively owns its connection and message store; a
/// re-mounted view constructs a fresh session, which re-dials and
/// re-fetches history.
pub struct ChatSession<E: Environment> {
    env: E,
    ctx: SessionContext,
    connection: Connection,
    store: MessageStore,
    counterpart: Option<Participant>,
    phase: Phase,
}

impl<E: Environment> ChatSession<E> {
    /// Create a session for the given context. Nothing happens until
    /// [`SessionEvent::Mount`].
    pub fn new(env: E, ctx: SessionContext) -> Self {
        let store = MessageStore::new(ctx.me.id.clone());
        Self { env, ctx, connection: Connection::new(), store, counterpart: None, phase: Phase::Unmounted }
    }

    /// Process an event and return actions for the driver.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Mount => self.handle_mount(),
            SessionEvent::TransportUp => self.handle_transport_up(),
            SessionEvent::TransportReestablished => self.handle_reestablished(),
            SessionEvent::TransportFailed { reason } => self.handle_transport_failed(reason),
            SessionEvent::TransportDown { reason } => self.handle_transport_down(reason),
            SessionEvent::EnvelopeReceived(envelope) => self.handle_envelope(envelope),
            SessionEvent::HistoryLoaded(records) => self.handle_history_loaded(records),
            SessionEvent::HistoryFailed { reason } => self.handle_history_failed(reason),
            SessionEvent::Submit { body } => self.handle_submit(&body),
            SessionEvent::Teardown => self.handle_teardown(),
        }
    }

    fn handle_mount(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Unmounted {
            return vec![];
        }

        match resolve_counterpart(&self.ctx) {
            CounterpartResolution::Counterpart(counterpart) => {
                match self.connection.open(self.ctx.me.id.clone()) {
                    Ok(actions) => {
                        self.counterpart = Some(counterpart);
                        self.phase = Phase::Active;
                        let mut out = self.convert_connection_actions(actions);
                        out.push(SessionAction::Render);
                        out
                    },
                    // Empty self id: fatal to the view only.
                    Err(err) => {
                        self.phase = Phase::Closed;
                        vec![
                            SessionAction::Log { message: format!("chat unusable: {err}") },
                            SessionAction::Redirect(Redirect::Dashboard),
                        ]
                    },
                }
            },
            CounterpartResolution::RequiresSelection => {
                self.phase = Phase::Closed;
                vec![SessionAction::Redirect(Redirect::ClientList)]
            },
            CounterpartResolution::NoCounterpart => {
                self.phase = Phase::Closed;
                vec![
                    SessionAction::Log {
                        message: "no counterpart for chat, redirecting".to_owned(),
                    },
                    SessionAction::Redirect(Redirect::Dashboard),
                ]
            },
        }
    }

    fn handle_transport_up(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Active {
            return vec![];
        }

        let actions = self.connection.established();
        let mut out = self.convert_connection_actions(actions);
        if out.is_empty() {
            return out;
        }

        // History is fetched once per mount, after the transport is up,
        // matching the backend's expectation that join precedes reads.
        if !self.store.seeded()
            && let Some(counterpart) = &self.counterpart
        {
            out.push(SessionAction::FetchHistory {
                self_id: self.ctx.me.id.clone(),
                other_id: counterpart.id.clone(),
            });
        }
        out.push(SessionAction::Render);
        out
    }

    fn handle_reestablished(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Active {
            return vec![];
        }

        let actions = self.connection.reestablished();
        let mut out = self.convert_connection_actions(actions);
        if !out.is_empty() {
            out.push(SessionAction::Render);
        }
        out
    }

    fn handle_transport_failed(&mut self, reason: String) -> Vec<SessionAction> {
        if self.phase != Phase::Active {
            return vec![];
        }
        let err = self.connection.failed(reason);
        vec![
            SessionAction::Log { message: format!("connection failed (transient): {err}") },
            SessionAction::Render,
        ]
    }

    fn handle_transport_down(&mut self, reason: String) -> Vec<SessionAction> {
        if self.phase != Phase::Active {
            return vec![];
        }
        let err = self.connection.dropped(reason);
        vec![
            SessionAction::Log { message: format!("disconnected: {err}") },
            SessionAction::Render,
        ]
    }

    fn handle_envelope(&mut self, envelope: InboundEnvelope) -> Vec<SessionAction> {
        if self.phase != Phase::Active {
            return vec![];
        }

        match self.store.receive(envelope.message.normalize()) {
            ReceiveOutcome::Appended | ReceiveOutcome::Confirmed => vec![SessionAction::Render],
            ReceiveOutcome::SuppressedSelfEcho => vec![SessionAction::Log {
                message: "ignoring echo of own message, local echo already shown".to_owned(),
            }],
            ReceiveOutcome::Duplicate => vec![SessionAction::Log {
                message: "dropping duplicate delivery".to_owned(),
            }],
        }
    }

    fn handle_history_loaded(&mut self, records: Vec<WireMessage>) -> Vec<SessionAction> {
        if self.phase != Phase::Active || self.store.seeded() {
            return vec![];
        }

        let count = records.len();
        self.store
            .seed_history(records.into_iter().map(WireMessage::into_history_entry).collect());

        vec![
            SessionAction::Log { message: format!("seeded {count} prior messages") },
            SessionAction::Render,
        ]
    }

    fn handle_history_failed(&mut self, reason: String) -> Vec<SessionAction> {
        if self.phase != Phase::Active || self.store.seeded() {
            return vec![];
        }

        // Availability over completeness: the conversation starts fresh
        // instead of blocking on the backlog.
        self.store.seed_history(Vec::new());

        vec![
            SessionAction::Log { message: format!("history fetch failed, starting empty: {reason}") },
            SessionAction::Render,
        ]
    }

    fn handle_submit(&mut self, body: &str) -> Vec<SessionAction> {
        if !self.can_send() {
            return vec![];
        }
        let Some(counterpart) = self.counterpart.clone() else {
            return vec![];
        };

        let sent_at = self.env.now_millis();
        let correlation_id = self.env.correlation_id();

        let Some(entry) = self.store.append_local(counterpart.id, body, sent_at, correlation_id)
        else {
            // Blank after trimming: rejected before any transport call.
            return vec![];
        };

        let outbound = OutboundMessage {
            from: entry.sender_id,
            to: entry.recipient_id,
            text: entry.body,
            created_at: entry.sent_at_millis,
            correlation_id: entry.correlation_id.unwrap_or_default(),
        };

        vec![
            SessionAction::Send(ClientFrame::SendMessage(outbound)),
            SessionAction::Render,
        ]
    }

    fn handle_teardown(&mut self) -> Vec<SessionAction> {
        let had_transport = self.phase == Phase::Active;
        self.connection.close();
        self.phase = Phase::Closed;

        if had_transport { vec![SessionAction::HangUp] } else { vec![] }
    }

    fn convert_connection_actions(
        &self,
        actions: Vec<ConnectionAction>,
    ) -> Vec<SessionAction> {
        actions
            .into_iter()
            .map(|action| match action {
                ConnectionAction::Dial => SessionAction::Dial,
                ConnectionAction::Announce { user_id } => {
                    SessionAction::Send(ClientFrame::Join(user_id))
                },
            })
            .collect()
    }

    /// Current connectivity, read-only.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The ordered conversation log, oldest first.
    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// True once history resolved (or failed to) and the view may
    /// leave its loading state.
    pub fn ready(&self) -> bool {
        self.store.seeded()
    }

    /// True when a submit would reach the transport: mounted, history
    /// resolved, connection up.
    pub fn can_send(&self) -> bool {
        self.phase == Phase::Active && self.store.seeded() && self.connection.can_send()
    }

    /// The resolved counterpart. `None` before mount or after redirect.
    pub fn counterpart(&self) -> Option<&Participant> {
        self.counterpart.as_ref()
    }
}
