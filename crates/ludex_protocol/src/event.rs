//! Push channel frames.

use crate::error::ProtocolResult;
use crate::record::GameRecord;
use serde::{Deserialize, Serialize};

/// Kind of push event delivered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushEventKind {
    /// A record was created.
    Created,
    /// A record was updated.
    Updated,
    /// A record was deleted.
    Deleted,
}

/// A push event carrying a full record.
///
/// The canonical envelope is flat: `{"event": "...", "payload": <record>}`.
/// The legacy nested shape (`{"payload": {"game": <record>}}`) is not
/// accepted; decoding it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    /// What happened to the record.
    pub event: PushEventKind,
    /// The affected record, as the backend now sees it.
    pub payload: GameRecord,
}

impl PushEvent {
    /// Encodes the event as a JSON frame.
    pub fn encode(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes an event from a JSON frame.
    pub fn decode(frame: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// The authorization handshake frame.
///
/// Sent as the first outbound frame after the push connection opens:
/// `{"type": "authorization", "payload": {"token": "<token>"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthFrame {
    /// Frame type tag; always `"authorization"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Token payload.
    pub payload: AuthPayload,
}

/// Payload of the authorization frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Opaque bearer token.
    pub token: String,
}

impl AuthFrame {
    /// Creates an authorization frame for the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            kind: "authorization".into(),
            payload: AuthPayload {
                token: token.into(),
            },
        }
    }

    /// Encodes the frame as JSON.
    pub fn encode(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameRecord {
        GameRecord {
            id: Some(3),
            appid: 20,
            name: "Team Fortress Classic".into(),
            developer: "Valve".into(),
            positive: 3318,
            negative: 633,
            owners: "5,000,000 .. 10,000,000".into(),
            price: 4.99,
            user_id: None,
            status: None,
            version: Some(1),
        }
    }

    #[test]
    fn event_roundtrip() {
        for kind in [
            PushEventKind::Created,
            PushEventKind::Updated,
            PushEventKind::Deleted,
        ] {
            let event = PushEvent {
                event: kind,
                payload: record(),
            };
            let frame = event.encode().unwrap();
            assert_eq!(PushEvent::decode(&frame).unwrap(), event);
        }
    }

    #[test]
    fn kind_is_lowercase_on_wire() {
        let event = PushEvent {
            event: PushEventKind::Created,
            payload: record(),
        };
        let frame = event.encode().unwrap();
        assert!(frame.contains("\"event\":\"created\""));
    }

    #[test]
    fn legacy_nested_payload_is_rejected() {
        let frame = format!(
            r#"{{"event":"updated","payload":{{"game":{}}}}}"#,
            record().encode().unwrap()
        );
        assert!(PushEvent::decode(&frame).is_err());
    }

    #[test]
    fn unknown_event_kind_is_rejected() {
        let frame = format!(
            r#"{{"event":"renamed","payload":{}}}"#,
            record().encode().unwrap()
        );
        assert!(PushEvent::decode(&frame).is_err());
    }

    #[test]
    fn auth_frame_shape() {
        let frame = AuthFrame::new("secret-token").encode().unwrap();
        assert!(frame.contains("\"type\":\"authorization\""));
        assert!(frame.contains("\"token\":\"secret-token\""));
    }
}
