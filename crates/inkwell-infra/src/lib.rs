//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the storage backends, password hashing and the
//! demo-content seeding routine.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL store via SeaORM

pub mod auth;
pub mod database;
pub mod memory;
pub mod seed;

pub use auth::Argon2Hasher;
pub use database::DatabaseConfig;
pub use memory::InMemoryStore;
pub use seed::{SeedConfig, SeedOutcome, seed_demo_content};

#[cfg(feature = "postgres")]
pub use database::PostgresStore;
