//! # Ludex Engine
//!
//! Synchronization state machine for the Ludex catalog client.
//!
//! This crate provides:
//! - A reducer-based state machine over the in-memory record list
//! - Fetch, save and delete operations against a remote API
//! - A local key-value fallback driven by an explicit sync policy
//! - A push-channel adapter that feeds server events into the same state
//! - Cooperative cancellation for fetch and push delivery
//!
//! ## Architecture
//!
//! All state lives in a single [`GamesState`] value. Every input - an
//! operation completing, a failure, a push event - becomes an [`Action`],
//! and actions are applied one at a time through an exhaustive reducer.
//! Because fetch, save, delete and push all funnel through the same
//! serialized dispatch, the last update to complete wins.
//!
//! The two deployment flavors of the original client (online-only and
//! offline-fallback) are collapsed into one engine parameterized by
//! [`SyncPolicy`], selected at construction time.
//!
//! ## Key invariants
//!
//! - The record list holds at most one entry per identifier
//! - Upsert replaces by identifier equality, else appends
//! - Removing an absent identifier is a no-op
//! - A cancelled fetch never mutates the record list

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod cancel;
mod config;
mod error;
mod http;
mod machine;
mod policy;
mod push;
mod state;

pub use api::{ApiError, ApiResult, GameApi, MockApi};
pub use cancel::CancelToken;
pub use config::EngineConfig;
pub use error::{SyncError, SyncResult};
pub use http::{HttpApi, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use machine::{SaveOutcome, SyncMachine};
pub use policy::SyncPolicy;
pub use push::{MockPeer, MockSocket, PushChannel, PushSocket};
pub use state::{reduce, Action, GamesState};
