//! Ordered message log with echo deduplication.
//!
//! The [`MessageStore`] is the single source of truth for what the
//! active conversation shows. It guarantees each logical message
//! appears exactly once even though the sender observes both a local
//! echo and, depending on server behavior, a broadcast of their own
//! send.
//!
//! Two suppression strategies run in order:
//!
//! 1. **Correlation id** (preferred): every outbound message carries a
//!    client-generated correlation id; an inbound event matching a
//!    known id confirms the existing entry in place instead of
//!    appending.
//! 2. **Server id**: an inbound event whose server id matches an entry
//!    already held is a redelivery and is dropped.
//! 3. **Self-origin** (fallback, for servers that strip both ids): an
//!    inbound event whose normalized sender equals the local user is
//!    discarded, because the send path already rendered the entry.
//!
//! Append order is local processing order. No global causal order is
//! assumed; each party's own view is internally consistent.

use crate::session::UserId;

/// Where a displayed entry came from. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Rendered optimistically at send time; no server confirmation
    /// observed yet.
    LocalPending,
    /// Created from (or confirmed by) a server event.
    RemoteConfirmed,
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Server-assigned id, present once the server has persisted the
    /// message (history records, confirmed echoes, counterpart sends).
    pub server_id: Option<String>,
    /// Client-generated id used for echo matching. Absent on history
    /// records and on events from servers that strip it.
    pub correlation_id: Option<String>,
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Trimmed, non-empty text.
    pub body: String,
    /// Sender-side timestamp, milliseconds since the Unix epoch.
    pub sent_at_millis: u64,
    /// Echo-dedup state.
    pub origin: MessageOrigin,
}

/// What [`MessageStore::receive`] did with an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// New counterpart message appended.
    Appended,
    /// Echo matched a pending local entry; confirmed in place.
    Confirmed,
    /// Echo of our own send with no correlation id; dropped because the
    /// local echo already rendered it.
    SuppressedSelfEcho,
    /// Correlation id already accounted for; dropped.
    Duplicate,
}

impl ReceiveOutcome {
    /// True when the store changed (appended or confirmed).
    pub fn mutated(&self) -> bool {
        matches!(self, Self::Appended | Self::Confirmed)
    }
}

/// Inbound event content after wire normalization.
///
/// The transport layer resolves the "bare id or expanded record"
/// ambiguity before this struct exists; the store only ever compares
/// normalized [`UserId`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Server-assigned id, if persisted.
    pub server_id: Option<String>,
    /// Correlation id echoed back, if the server preserves it.
    pub correlation_id: Option<String>,
    /// Normalized author id.
    pub sender_id: UserId,
    /// Normalized addressee id.
    pub recipient_id: UserId,
    /// Message text.
    pub body: String,
    /// Sender-side timestamp.
    pub sent_at_millis: u64,
}

/// Append-only log for one conversation, owned by one mounted view.
///
/// Dropped (not persisted) at teardown; history re-seeds from the
/// server on the next mount.
#[derive(Debug, Clone)]
pub struct MessageStore {
    self_id: UserId,
    entries: Vec<Message>,
    seeded: bool,
}

impl MessageStore {
    /// Create an empty store for the given local user.
    pub fn new(self_id: UserId) -> Self {
        Self { self_id, entries: Vec::new(), seeded: false }
    }

    /// The ordered log, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is displayed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once history seeding has happened (even with zero records).
    pub fn seeded(&self) -> bool {
        self.seeded
    }

    /// Seed the log with prior messages, oldest first.
    ///
    /// Called exactly once per mount, before send is enabled. A failed
    /// history fetch seeds an empty slice so the conversation starts
    /// fresh instead of blocking. Records are sorted by timestamp;
    /// the sort is stable so server order breaks ties.
    pub fn seed_history(&mut self, mut records: Vec<Message>) {
        debug_assert!(!self.seeded, "history seeds at most once per mount");
        records.sort_by_key(|m| m.sent_at_millis);
        self.entries = records;
        self.seeded = true;
    }

    /// Optimistically append a local send.
    ///
    /// Returns the appended entry (for the outbound wire payload), or
    /// `None` when the body is empty after trimming, in which case
    /// nothing is appended and nothing should reach the transport.
    pub fn append_local(
        &mut self,
        recipient_id: UserId,
        body: &str,
        sent_at_millis: u64,
        correlation_id: String,
    ) -> Option<Message> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let entry = Message {
            server_id: None,
            correlation_id: Some(correlation_id),
            sender_id: self.self_id.clone(),
            recipient_id,
            body: body.to_owned(),
            sent_at_millis,
            origin: MessageOrigin::LocalPending,
        };
        self.entries.push(entry.clone());
        Some(entry)
    }

    /// Process one inbound message event.
    pub fn receive(&mut self, inbound: InboundMessage) -> ReceiveOutcome {
        if let Some(correlation_id) = &inbound.correlation_id
            && let Some(entry) =
                self.entries.iter_mut().find(|m| m.correlation_id.as_ref() == Some(correlation_id))
        {
            if entry.origin == MessageOrigin::LocalPending {
                entry.origin = MessageOrigin::RemoteConfirmed;
                entry.server_id = inbound.server_id;
                return ReceiveOutcome::Confirmed;
            }
            return ReceiveOutcome::Duplicate;
        }

        // A redelivered envelope carries the server id of an entry we
        // already hold; drop it to keep the log exactly-once.
        if let Some(server_id) = &inbound.server_id
            && self.entries.iter().any(|m| m.server_id.as_deref() == Some(server_id))
        {
            return ReceiveOutcome::Duplicate;
        }

        // No correlation match: fall back to sender comparison. Both
        // sides are normalized UserIds, so the string-vs-record
        // mismatch that plagued the original cannot reach this point.
        if inbound.sender_id == self.self_id {
            return ReceiveOutcome::SuppressedSelfEcho;
        }

        self.entries.push(Message {
            server_id: inbound.server_id,
            correlation_id: inbound.correlation_id,
            sender_id: inbound.sender_id,
            recipient_id: inbound.recipient_id,
            body: inbound.body,
            sent_at_millis: inbound.sent_at_millis,
            origin: MessageOrigin::RemoteConfirmed,
        });
        ReceiveOutcome::Appended
    }

    /// Entries authored by the local user.
    pub fn local_count(&self) -> usize {
        self.entries.iter().filter(|m| m.sender_id == self.self_id).count()
    }
}
