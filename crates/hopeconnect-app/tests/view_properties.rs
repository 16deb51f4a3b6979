//! Property-based tests for the view state machine and bridge.
//!
//! Tests verify that invariants hold under arbitrary event sequences.

#![allow(clippy::unwrap_used)]

use hopeconnect_app::{Banner, Bridge, ChatView, IoRequest, ViewAction, ViewEvent};
use hopeconnect_client::{
    SessionEvent,
    wire::{InboundEnvelope, PartyRef, WireMessage},
};
use hopeconnect_core::{
    ConnectionState, Participant, Role, SessionContext, UserId, env::test_utils::MockEnv,
};
use proptest::prelude::*;

fn victim_ctx() -> SessionContext {
    let me =
        Participant { id: UserId::new("v1"), display_name: "Ana".to_owned(), role: Role::Victim };
    let counselor = Participant {
        id: UserId::new("c1"),
        display_name: "Dana".to_owned(),
        role: Role::Counselor,
    };
    SessionContext::new(me, "token").with_assigned_counselor(counselor)
}

/// Bridge mounted, connected, and seeded with empty history.
fn ready_bridge() -> Bridge<MockEnv> {
    let mut bridge = Bridge::new(MockEnv::new(), victim_ctx());
    let _ = bridge.mount();
    let _ = bridge.handle_session_event(SessionEvent::TransportUp);
    let _ = bridge.handle_session_event(SessionEvent::HistoryLoaded(vec![]));
    let _ = bridge.take_io();
    bridge
}

fn envelope_from(sender: &str, body: &str, at: u64) -> SessionEvent {
    SessionEvent::EnvelopeReceived(InboundEnvelope {
        message: WireMessage {
            id: Some(format!("srv-{at}")),
            from: PartyRef::Id(sender.to_owned()),
            to: PartyRef::Id("v1".to_owned()),
            text: body.to_owned(),
            created_at: at,
            correlation_id: None,
        },
    })
}

/// Generate random view events.
fn view_event_strategy() -> impl Strategy<Value = ViewEvent> {
    prop_oneof![
        3 => "[a-z ]{0,12}".prop_map(ViewEvent::DraftChanged),
        2 => Just(ViewEvent::SubmitPressed),
        1 => "[a-z]{1,10}".prop_map(ViewEvent::StatusMessage),
    ]
}

proptest! {
    #[test]
    fn prop_view_never_submits_blank_or_disabled(
        events in prop::collection::vec(view_event_strategy(), 0..40),
        connected in any::<bool>(),
    ) {
        let mut view = ChatView::new();
        let mut snapshot = hopeconnect_app::SessionSnapshot::default();
        if connected {
            snapshot.connection = ConnectionState::Connected;
            snapshot.ready = true;
            snapshot.can_send = true;
        }
        let _ = view.handle(ViewEvent::SessionChanged(snapshot));

        for event in events {
            let actions = view.handle(event);
            for action in actions {
                if let ViewAction::Submit { body } = action {
                    // A submit only ever fires connected and non-blank.
                    prop_assert!(connected);
                    prop_assert!(!body.trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn prop_submit_count_equals_transcript_local_entries(
        drafts in prop::collection::vec("[a-z]{1,8}", 1..10),
    ) {
        let mut bridge = ready_bridge();
        for draft in &drafts {
            let _ = bridge.submit(draft.clone());
        }

        let snapshot = bridge.snapshot();
        prop_assert_eq!(snapshot.transcript.len(), drafts.len());
        prop_assert!(snapshot.transcript.iter().all(|e| e.mine && e.pending));

        let frames = bridge
            .take_io()
            .into_iter()
            .filter(|r| matches!(r, IoRequest::SendFrame(_)))
            .count();
        prop_assert_eq!(frames, drafts.len());
    }

    #[test]
    fn prop_counterpart_envelopes_append_exactly_once(
        bodies in prop::collection::vec("[a-z]{1,8}", 1..10),
    ) {
        let mut bridge = ready_bridge();
        for (i, body) in bodies.iter().enumerate() {
            let event = envelope_from("c1", body, i as u64);
            // Replay every envelope twice; the duplicate is dropped.
            let _ = bridge.handle_session_event(event.clone());
            let _ = bridge.handle_session_event(event);
        }

        let snapshot = bridge.snapshot();
        prop_assert_eq!(snapshot.transcript.len(), bodies.len());
        prop_assert!(snapshot.transcript.iter().all(|e| !e.mine && !e.pending));
    }
}

#[test]
fn basic_view_bridge_flow() {
    let mut view = ChatView::new();
    let mut bridge = Bridge::new(MockEnv::new(), victim_ctx());

    assert!(view.loading());

    for event in bridge.mount() {
        let _ = view.handle(event);
    }
    assert_eq!(bridge.take_io(), vec![IoRequest::Dial]);
    assert_eq!(view.banner(), Banner::Connecting);

    for event in bridge.handle_session_event(SessionEvent::TransportUp) {
        let _ = view.handle(event);
    }
    assert_eq!(view.banner(), Banner::ActiveNow);
    assert!(view.loading());

    for event in bridge.handle_session_event(SessionEvent::HistoryLoaded(vec![])) {
        let _ = view.handle(event);
    }
    assert!(!view.loading());
    assert_eq!(view.counterpart_name(), Some("Dana"));

    let _ = view.handle(ViewEvent::DraftChanged("hello".to_owned()));
    assert!(view.send_enabled());
    let actions = view.handle(ViewEvent::SubmitPressed);
    let ViewAction::Submit { body } = &actions[0] else {
        panic!("expected a submit action");
    };
    for event in bridge.submit(body.clone()) {
        let _ = view.handle(event);
    }

    assert_eq!(view.transcript().len(), 1);
    assert!(view.transcript()[0].mine);
    assert!(view.draft().is_empty());
}

#[test]
fn disconnect_disables_send_but_keeps_transcript() {
    let mut view = ChatView::new();
    let mut bridge = ready_bridge();

    for event in bridge.submit("first".to_owned()) {
        let _ = view.handle(event);
    }
    for event in bridge
        .handle_session_event(SessionEvent::TransportDown { reason: "server restart".to_owned() })
    {
        let _ = view.handle(event);
    }

    assert_eq!(view.banner(), Banner::Offline);
    let _ = view.handle(ViewEvent::DraftChanged("still there?".to_owned()));
    assert!(!view.send_enabled());
    // The optimistic entry survives the drop.
    assert_eq!(view.transcript().len(), 1);
}
