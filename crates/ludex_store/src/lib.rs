//! # Ludex Store
//!
//! Local key-value store contract and backends for the Ludex catalog client.
//!
//! The synchronization engine mirrors records into a key-value store so the
//! client can keep operating when the backend is unreachable. Backends are
//! **opaque string stores**: one value per key, last write wins. The engine
//! owns the record encoding; backends never interpret values.
//!
//! ## Available backends
//!
//! - [`MemoryStore`] - for tests and ephemeral use
//! - [`FileStore`] - one file per key under a root directory
//!
//! ## Example
//!
//! ```rust
//! use ludex_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("17", "{\"appid\":10}").unwrap();
//! assert_eq!(store.get("17").unwrap().as_deref(), Some("{\"appid\":10}"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
