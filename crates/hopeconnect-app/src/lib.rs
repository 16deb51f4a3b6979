//! View layer for the Hope Connect chat client.
//!
//! Pure state machines and a generic runtime for the chat screen,
//! enabling deterministic testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`ChatView`]: view state machine (draft handling, send affordance,
//!   banner, transcript snapshot)
//! - [`Bridge`]: session bridge (translates view actions to session
//!   events, accumulates requested I/O)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::ViewAction;
pub use app::ChatView;
pub use bridge::{Bridge, IoRequest};
pub use driver::Driver;
pub use event::ViewEvent;
pub use runtime::Runtime;
pub use state::{Banner, SessionSnapshot, TranscriptEntry};
