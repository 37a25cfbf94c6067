//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog platform.
//! This crate contains the entities, the storage ports and the pure feed
//! and slug logic, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod feed;
pub mod ports;
pub mod slug;

pub use error::{DomainError, RepoError};
