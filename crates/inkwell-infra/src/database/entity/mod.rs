//! SeaORM entities mirroring the tables created by the `migration` crate.

pub mod post;
pub mod post_tag;
pub mod subscriber;
pub mod tag;
pub mod user;
