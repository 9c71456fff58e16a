//! Shared types for the data layer

pub mod errors;

pub use errors::{DomainError, DomainResult};
