//! Messaging core: who is online, how messages reach them, and the
//! services the HTTP/websocket layer calls into.

pub mod dispatch;
pub mod events;
pub mod media;
pub mod presence;
pub mod services;

pub use dispatch::DeliveryDispatcher;
pub use events::PushEvent;
pub use media::{kind_for_attachments, LocalMediaStore};
pub use presence::{ConnectionHandle, PresenceRegistry};
pub use services::{GroupService, MessageService, UserService};
