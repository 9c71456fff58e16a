//! Domain entity definitions

pub mod group;
pub mod message;
pub mod user;

pub use group::{Group, NewGroup};
pub use message::{Message, MessageKind, NewDirectMessage, NewGroupMessage, UnreadCount};
pub use user::{NewUser, User};
