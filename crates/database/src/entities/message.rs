//! Message entity definitions

use serde::{Deserialize, Serialize};

/// A persisted chat message. Exactly one of `receiver_id` / `group_id`
/// is set; `read` is only meaningful for direct messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub public_id: String,
    pub sender_id: i64,
    pub sender_public_id: String,
    pub receiver_id: Option<i64>,
    pub receiver_public_id: Option<String>,
    pub group_id: Option<i64>,
    pub group_public_id: Option<String>,
    pub content: String,
    pub kind: MessageKind,
    pub attachment_urls: Vec<String>,
    pub read: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Message {
    /// Whether this message was addressed to a single user.
    pub fn is_direct(&self) -> bool {
        self.receiver_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDirectMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub attachment_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroupMessage {
    pub sender_id: i64,
    pub group_id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub attachment_urls: Vec<String>,
}

/// Unread direct messages from one sender, derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub sender_public_id: String,
    pub count: i64,
}

/// Message content classification, derived from attachment extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Mixed,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Mixed => "mixed",
        }
    }
}

impl From<&str> for MessageKind {
    fn from(s: &str) -> Self {
        match s {
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "mixed" => MessageKind::Mixed,
            _ => MessageKind::Text,
        }
    }
}

impl ToString for MessageKind {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_conversion() {
        assert_eq!(MessageKind::from("text"), MessageKind::Text);
        assert_eq!(MessageKind::from("image"), MessageKind::Image);
        assert_eq!(MessageKind::from("video"), MessageKind::Video);
        assert_eq!(MessageKind::from("mixed"), MessageKind::Mixed);
        assert_eq!(MessageKind::from("unknown"), MessageKind::Text);

        assert_eq!(MessageKind::Image.to_string(), "image");
        assert_eq!(MessageKind::Mixed.as_str(), "mixed");
    }
}
