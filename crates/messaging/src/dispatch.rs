//! Best-effort push delivery to online users.
//!
//! Dispatch runs after the message has been written to the database, so a
//! failed or skipped push never loses data; offline recipients pick the
//! message up on their next conversation fetch.

use courier_database::Message;
use tracing::{debug, warn};

use crate::events::PushEvent;
use crate::presence::PresenceRegistry;

#[derive(Debug, Clone)]
pub struct DeliveryDispatcher {
    presence: PresenceRegistry,
}

impl DeliveryDispatcher {
    pub fn new(presence: PresenceRegistry) -> Self {
        Self { presence }
    }

    /// Pushes a direct message to its receiver, if they are online.
    pub async fn notify_direct(&self, message: &Message) {
        let Some(receiver_id) = message.receiver_id else {
            return;
        };
        let Some(handle) = self.presence.lookup(receiver_id).await else {
            debug!(receiver_id, message = %message.public_id, "receiver offline, skipping push");
            return;
        };
        let event = PushEvent::MessageReceived {
            message: message.clone(),
            sender_id: message.sender_public_id.clone(),
        };
        if let Err(error) = handle.try_push(event) {
            warn!(receiver_id, %error, "dropping direct push");
        }
    }

    /// Pushes a group message to every online member, the sender included.
    pub async fn notify_group(&self, message: &Message, member_ids: &[i64]) {
        let Some(group_id) = message.group_public_id.clone() else {
            return;
        };
        for &member_id in member_ids {
            let Some(handle) = self.presence.lookup(member_id).await else {
                continue;
            };
            let event = PushEvent::NewGroupMessage {
                message: message.clone(),
                group_id: group_id.clone(),
                sender_id: message.sender_public_id.clone(),
            };
            if let Err(error) = handle.try_push(event) {
                warn!(member_id, %error, "dropping group push");
            }
        }
    }
}
