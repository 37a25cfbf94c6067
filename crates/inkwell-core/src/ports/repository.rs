use async_trait::async_trait;

use crate::domain::{
    NewPost, NewSubscriber, NewTag, NewUser, PaginatedPosts, Post, PostTag, PostUpdate, Subscriber,
    Tag, TagUpdate, User,
};
use crate::error::RepoError;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<Option<User>, RepoError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;

    /// Whether at least one user exists. Seeding keys off this.
    async fn has_users(&self) -> Result<bool, RepoError>;
}

/// Post repository. Every listing is ordered by `published_at` descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn get_post(&self, id: i32) -> Result<Option<Post>, RepoError>;

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// The most recently published post.
    async fn get_featured_post(&self) -> Result<Option<Post>, RepoError>;

    /// One page of posts. `page` is 1-based; callers guarantee `page >= 1`
    /// and `limit >= 1`.
    async fn get_paginated_posts(&self, page: u64, limit: u64)
    -> Result<PaginatedPosts, RepoError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Partially update a post. Returns `None` when the id is unknown.
    async fn update_post(&self, id: i32, update: PostUpdate) -> Result<Option<Post>, RepoError>;

    /// Delete a post and its tag associations. Returns whether the post existed.
    async fn delete_post(&self, id: i32) -> Result<bool, RepoError>;
}

/// Tag repository, including the post/tag association.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags ordered by name.
    async fn get_all_tags(&self) -> Result<Vec<Tag>, RepoError>;

    async fn get_tag(&self, id: i32) -> Result<Option<Tag>, RepoError>;

    async fn get_tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    async fn create_tag(&self, tag: NewTag) -> Result<Tag, RepoError>;

    async fn update_tag(&self, id: i32, update: TagUpdate) -> Result<Option<Tag>, RepoError>;

    /// Delete a tag and its post associations.
    async fn delete_tag(&self, id: i32) -> Result<bool, RepoError>;

    /// Associate a tag with a post. An existing association is returned as is.
    async fn add_tag_to_post(&self, post_id: i32, tag_id: i32) -> Result<PostTag, RepoError>;

    async fn remove_tag_from_post(&self, post_id: i32, tag_id: i32) -> Result<bool, RepoError>;

    async fn get_tags_for_post(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;

    async fn get_posts_for_tag(&self, tag_id: i32) -> Result<Vec<Post>, RepoError>;

    /// Posts carrying the tag with this slug; empty when the slug is unknown.
    async fn get_posts_for_tag_slug(&self, slug: &str) -> Result<Vec<Post>, RepoError>;
}

/// Newsletter subscriber repository.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn create_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber, RepoError>;

    async fn get_subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, RepoError>;

    /// All subscribers, oldest first.
    async fn get_all_subscribers(&self) -> Result<Vec<Subscriber>, RepoError>;
}

/// The full storage capability the route layer depends on.
pub trait BlogStore: UserRepository + PostRepository + TagRepository + SubscriberRepository {
    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}
