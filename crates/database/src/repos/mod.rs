//! Data access layer for the Courier backend.
//!
//! Repositories own all SQL and present a typed interface to the
//! service layer above them.

pub mod group_repository;
pub mod message_repository;
pub mod user_repository;

pub use group_repository::GroupRepository;
pub use message_repository::MessageRepository;
pub use user_repository::UserRepository;
