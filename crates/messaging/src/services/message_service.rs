//! Conversation orchestration: validate, persist, then push.

use courier_database::{
    DomainError, DomainResult, GroupRepository, Message, MessageKind, MessageRepository,
    NewDirectMessage, NewGroupMessage, UnreadCount, User, UserRepository,
};
use sqlx::SqlitePool;

use crate::dispatch::DeliveryDispatcher;
use crate::media::kind_for_attachments;

pub struct MessageService {
    messages: MessageRepository,
    groups: GroupRepository,
    users: UserRepository,
    dispatcher: DeliveryDispatcher,
}

impl MessageService {
    pub fn new(pool: SqlitePool, dispatcher: DeliveryDispatcher) -> Self {
        Self {
            messages: MessageRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            dispatcher,
        }
    }

    /// Sends a direct message. The write commits before any push happens, so
    /// an offline receiver still sees the message on their next fetch.
    pub async fn send_direct(
        &self,
        sender: &User,
        receiver_public_id: &str,
        content: Option<String>,
        attachment_urls: Vec<String>,
    ) -> DomainResult<Message> {
        let receiver = self
            .users
            .find_by_public_id(receiver_public_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        let (content, kind) = prepare_payload(content, &attachment_urls)?;

        let message = self
            .messages
            .create_direct(&NewDirectMessage {
                sender_id: sender.id,
                receiver_id: receiver.id,
                content,
                kind,
                attachment_urls,
            })
            .await?;

        self.dispatcher.notify_direct(&message).await;
        Ok(message)
    }

    /// Sends a message to a group the sender belongs to, then pushes it to
    /// every online member.
    pub async fn send_group(
        &self,
        sender: &User,
        group_public_id: &str,
        content: Option<String>,
        attachment_urls: Vec<String>,
    ) -> DomainResult<Message> {
        let group = self.require_membership(group_public_id, sender.id).await?;
        let (content, kind) = prepare_payload(content, &attachment_urls)?;

        let message = self
            .messages
            .create_group(&NewGroupMessage {
                sender_id: sender.id,
                group_id: group.id,
                content,
                kind,
                attachment_urls,
            })
            .await?;

        let member_ids = self.groups.member_ids(group.id).await?;
        self.dispatcher.notify_group(&message, &member_ids).await;
        Ok(message)
    }

    /// Full direct history between the actor and one counterpart, oldest
    /// first.
    pub async fn list_conversation(
        &self,
        actor: &User,
        counterpart_public_id: &str,
    ) -> DomainResult<Vec<Message>> {
        let counterpart = self
            .users
            .find_by_public_id(counterpart_public_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.messages.list_conversation(actor.id, counterpart.id).await
    }

    /// Full group history, oldest first. Members only.
    pub async fn list_group_conversation(
        &self,
        actor: &User,
        group_public_id: &str,
    ) -> DomainResult<Vec<Message>> {
        let group = self.require_membership(group_public_id, actor.id).await?;
        self.messages.list_group(group.id).await
    }

    /// Replaces a message's content. Only the sender may edit.
    pub async fn edit_message(
        &self,
        actor: &User,
        message_public_id: &str,
        content: &str,
    ) -> DomainResult<Message> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("message content is required"));
        }
        self.messages
            .update_content(message_public_id, actor.id, content)
            .await
    }

    /// Removes a message permanently. Only the sender may delete.
    pub async fn delete_message(
        &self,
        actor: &User,
        message_public_id: &str,
    ) -> DomainResult<()> {
        self.messages.delete(message_public_id, actor.id).await
    }

    /// Marks every unread direct message from `sender_public_id` to the actor
    /// as read. Returns how many rows changed.
    pub async fn mark_read(&self, actor: &User, sender_public_id: &str) -> DomainResult<u64> {
        let sender = self
            .users
            .find_by_public_id(sender_public_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        self.messages.mark_read(actor.id, sender.id).await
    }

    /// Per-sender unread totals for the actor's direct conversations.
    pub async fn unread_counts(&self, actor: &User) -> DomainResult<Vec<UnreadCount>> {
        self.messages.unread_counts(actor.id).await
    }

    async fn require_membership(
        &self,
        group_public_id: &str,
        user_id: i64,
    ) -> DomainResult<courier_database::Group> {
        let group = self
            .groups
            .find_by_public_id(group_public_id)
            .await?
            .ok_or(DomainError::GroupNotFound)?;
        if !self.groups.is_member(group.id, user_id).await? {
            return Err(DomainError::forbidden("not a member of this group"));
        }
        Ok(group)
    }
}

/// Normalizes the content/attachments pair. Attachments decide the message
/// kind and clear the text; a bare message must carry non-empty text.
fn prepare_payload(
    content: Option<String>,
    attachment_urls: &[String],
) -> DomainResult<(String, MessageKind)> {
    if !attachment_urls.is_empty() {
        return Ok((String::new(), kind_for_attachments(attachment_urls)));
    }
    let content = content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(DomainError::validation(
            "message content or attachments required",
        ));
    }
    Ok((content, MessageKind::Text))
}
