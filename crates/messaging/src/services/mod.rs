//! Application services over the repositories.

pub mod group_service;
pub mod message_service;
pub mod user_service;

pub use group_service::GroupService;
pub use message_service::MessageService;
pub use user_service::UserService;
