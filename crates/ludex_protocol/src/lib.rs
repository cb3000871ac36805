//! # Ludex Protocol
//!
//! Record, push-event and conflict types for the Ludex catalog client.
//!
//! This crate provides:
//! - `GameRecord`, the catalog entry exchanged with the backend
//! - `PushEvent` and `AuthFrame` for the push channel
//! - `EditConflict` for the version-conflict resolution surface
//! - JSON encoding/decoding for all of the above
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod conflict;
mod error;
mod event;
mod record;

pub use conflict::{ConflictChoice, EditConflict};
pub use error::{ProtocolError, ProtocolResult};
pub use event::{AuthFrame, AuthPayload, PushEvent, PushEventKind};
pub use record::GameRecord;
