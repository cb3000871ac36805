//! The game catalog record.

use crate::error::ProtocolResult;
use serde::{Deserialize, Serialize};

/// A single game catalog entry.
///
/// Records are uniquely keyed by `id` once the backend (or the offline
/// fallback) has assigned one. A record without an `id` is "new" and has
/// never been persisted anywhere.
///
/// # Fields
///
/// - `id`: assigned by the backend on create, or minted locally from the
///   wall clock while offline
/// - `appid`: external catalog identifier
/// - `version`: monotonic edit counter, incremented by exactly one on each
///   successful edit; used to detect concurrent edits of the same base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Record identifier. Absent until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// External catalog id.
    pub appid: i64,
    /// Display name.
    pub name: String,
    /// Developer name.
    pub developer: String,
    /// Positive-rating count.
    pub positive: u32,
    /// Negative-rating count.
    pub negative: u32,
    /// Owners range, free text (e.g. "0 .. 20,000").
    pub owners: String,
    /// Price.
    pub price: f64,
    /// Owning user id, when the deployment scopes records per user.
    #[serde(
        default,
        rename = "userId",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<i64>,
    /// Status flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    /// Monotonic version counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl GameRecord {
    /// Returns true if this record has not been assigned an identifier yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the local-store key for this record, if it has an id.
    ///
    /// The persisted layout is one entry per record, keyed by the
    /// stringified identifier.
    pub fn storage_key(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    /// Returns true if `other` is the same record (identifier equality).
    ///
    /// Two records without identifiers are never the same record.
    pub fn same_identity(&self, other: &GameRecord) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Encodes the record as JSON.
    pub fn encode(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a record from JSON.
    pub fn decode(json: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
