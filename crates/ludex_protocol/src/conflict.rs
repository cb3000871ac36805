//! Version-conflict surface for concurrent edits.

use crate::record::GameRecord;
use serde::{Deserialize, Serialize};

/// A rejected edit, carrying both sides of the conflict.
///
/// When an update is attempted against a record whose server-side version
/// has advanced past the client's base version, the backend returns both
/// the client's intended edit and its own current copy. The caller chooses
/// a [`ConflictChoice`]; either choice yields a record suitable for a new
/// save call, with `version = server version + 1`.
///
/// Wire shape (HTTP 409 body):
/// `{"attempted": <record>, "current": <record>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditConflict {
    /// The edit the client tried to apply.
    #[serde(rename = "attempted")]
    pub local: GameRecord,
    /// The record as the server currently has it.
    #[serde(rename = "current")]
    pub server: GameRecord,
}

/// How to resolve an [`EditConflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Reapply the client's edit on top of the server's version.
    KeepLocal,
    /// Accept the server copy as-is.
    AcceptServer,
}

impl EditConflict {
    /// Creates a conflict from the two copies.
    pub fn new(local: GameRecord, server: GameRecord) -> Self {
        Self { local, server }
    }

    /// The version the resolved record must carry: server version + 1.
    pub fn next_version(&self) -> u64 {
        self.server.version.unwrap_or(0) + 1
    }

    /// Resolves the conflict, producing the record to save next.
    ///
    /// Both choices keep the original record's identifier; only the field
    /// values differ.
    pub fn resolve(&self, choice: ConflictChoice) -> GameRecord {
        let mut resolved = match choice {
            ConflictChoice::KeepLocal => self.local.clone(),
            ConflictChoice::AcceptServer => self.server.clone(),
        };
        resolved.id = self.local.id;
        resolved.version = Some(self.next_version());
        resolved
    }
}
