//! Domain entities - the core business objects.

mod post;
mod subscriber;
mod tag;
mod user;

pub use post::{NewPost, PaginatedPosts, Post, PostUpdate, PostWithTags, sort_by_recency};
pub use subscriber::{NewSubscriber, Subscriber};
pub use tag::{NewTag, PostTag, Tag, TagUpdate};
pub use user::{NewUser, User};
