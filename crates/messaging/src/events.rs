//! Events pushed to connected clients over the websocket.

use courier_database::Message;
use serde::{Deserialize, Serialize};

/// Server-to-client push payloads, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    /// A direct message addressed to the receiving user.
    MessageReceived { message: Message, sender_id: String },
    /// A message posted to a group the receiving user belongs to.
    NewGroupMessage {
        message: Message,
        group_id: String,
        sender_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_database::MessageKind;

    fn sample_message() -> Message {
        Message {
            id: 1,
            public_id: "m1".into(),
            sender_id: 1,
            sender_public_id: "alice".into(),
            receiver_id: Some(2),
            receiver_public_id: Some("bob".into()),
            group_id: None,
            group_public_id: None,
            content: "hello".into(),
            kind: MessageKind::Text,
            attachment_urls: Vec::new(),
            read: false,
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: None,
        }
    }

    #[test]
    fn direct_event_is_tagged() {
        let event = PushEvent::MessageReceived {
            message: sample_message(),
            sender_id: "alice".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "message_received");
        assert_eq!(value["sender_id"], "alice");
        assert_eq!(value["message"]["content"], "hello");
    }

    #[test]
    fn group_event_is_tagged() {
        let event = PushEvent::NewGroupMessage {
            message: sample_message(),
            group_id: "g1".into(),
            sender_id: "alice".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_group_message");
        assert_eq!(value["group_id"], "g1");
    }
}
