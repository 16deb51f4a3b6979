//! Core state machines and data model for the Hope Connect chat client.
//!
//! Everything in this crate is sans-IO: the connection lifecycle, the
//! message store, and the counterpart policy are pure state machines and
//! functions that consume typed inputs and produce typed outputs. Drivers
//! and transports live in `hopeconnect-client`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod connection;
pub mod env;
pub mod error;
pub mod policy;
pub mod session;
pub mod store;

pub use connection::{Connection, ConnectionAction, ConnectionState};
pub use env::Environment;
pub use error::ConnectionError;
pub use policy::{CounterpartResolution, resolve_counterpart};
pub use session::{Participant, Role, SessionContext, UserId};
pub use store::{InboundMessage, Message, MessageOrigin, MessageStore, ReceiveOutcome};
