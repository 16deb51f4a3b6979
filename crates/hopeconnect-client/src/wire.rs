//! JSON wire types for the messaging backend.
//!
//! The backend speaks JSON over a socket: a `join` announcement after
//! connect, `send_message` for outbound chat, and `receive_message`
//! events inbound. History arrives as a JSON array of message records
//! over REST. Field names follow the server's camelCase convention.
//!
//! The server is inconsistent about party references: depending on the
//! code path it sends a bare id string or an expanded record
//! (`{"_id": ..., "name": ...}`). [`PartyRef`] absorbs both shapes so
//! everything past deserialization compares normalized [`UserId`]s.

use hopeconnect_core::{InboundMessage, Message, MessageOrigin, UserId};
use serde::{Deserialize, Serialize};

/// Frames the client emits on the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Identity announcement; the server binds this transport session
    /// to the user so it can route messages addressed to them.
    Join(UserId),

    /// An outbound chat message. Fire-and-forget: no acknowledgment is
    /// awaited, durability is the server's concern.
    SendMessage(OutboundMessage),
}

/// Payload of a `send_message` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Author (always the local user).
    pub from: UserId,
    /// Addressee.
    pub to: UserId,
    /// Trimmed message text.
    pub text: String,
    /// Client-side timestamp, milliseconds since the Unix epoch.
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    /// Client-generated id the server is asked to echo back, so the
    /// sender can match the broadcast against its local entry.
    #[serde(rename = "correlationId")]
    pub correlation_id: String,
}

/// A `receive_message` event as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InboundEnvelope {
    /// The wrapped message record.
    pub message: WireMessage,
}

/// A message record as the server shapes it, in socket events and in
/// history responses alike.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WireMessage {
    /// Server-assigned id, present once persisted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Author, bare id or expanded record.
    pub from: PartyRef,
    /// Addressee, bare id or expanded record.
    pub to: PartyRef,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Sender-side timestamp, milliseconds since the Unix epoch.
    #[serde(rename = "createdAt", default)]
    pub created_at: u64,
    /// Correlation id, when the server preserves it.
    #[serde(rename = "correlationId", default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl WireMessage {
    /// Normalize into the store's inbound representation.
    pub fn normalize(self) -> InboundMessage {
        InboundMessage {
            server_id: self.id,
            correlation_id: self.correlation_id,
            sender_id: self.from.user_id(),
            recipient_id: self.to.user_id(),
            body: self.text,
            sent_at_millis: self.created_at,
        }
    }

    /// Convert a history record into a confirmed store entry.
    pub fn into_history_entry(self) -> Message {
        Message {
            server_id: self.id,
            correlation_id: self.correlation_id,
            sender_id: self.from.user_id(),
            recipient_id: self.to.user_id(),
            body: self.text,
            sent_at_millis: self.created_at,
            origin: MessageOrigin::RemoteConfirmed,
        }
    }
}

/// A party reference in either wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PartyRef {
    /// Bare id string.
    Id(String),
    /// Expanded participant record.
    Expanded {
        /// Server-assigned id.
        #[serde(rename = "_id")]
        id: String,
        /// Display name, when the server includes it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl PartyRef {
    /// The normalized bare id, whichever shape arrived.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Id(id) | Self::Expanded { id, .. } => UserId::new(id),
        }
    }
}
