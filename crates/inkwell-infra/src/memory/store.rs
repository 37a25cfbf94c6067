//! In-memory blog store - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use inkwell_core::domain::{
    NewPost, NewSubscriber, NewTag, NewUser, PaginatedPosts, Post, PostTag, PostUpdate, Subscriber,
    Tag, TagUpdate, User, sort_by_recency,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BlogStore, PostRepository, SubscriberRepository, TagRepository, UserRepository,
};

/// One table: rows keyed by id plus the next id to hand out.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

struct Tables {
    users: Table<User>,
    posts: Table<Post>,
    tags: Table<Tag>,
    post_tags: Table<PostTag>,
    subscribers: Table<Subscriber>,
}

/// Map-backed implementation of every repository port.
///
/// Ids auto-increment per table starting at 1. Unique columns are checked on
/// insert and update so callers see the same constraint errors as with
/// Postgres. Referential integrity of `post_tags` is not enforced.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: Table::new(),
                posts: Table::new(),
                tags: Table::new(),
                post_tags: Table::new(),
                subscribers: Table::new(),
            }),
        }
    }

    fn posts_by_recency<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.cloned().collect();
        sort_by_recency(&mut posts);
        posts
    }

    fn posts_with_tag(tables: &Tables, tag_id: i32) -> Vec<Post> {
        let post_ids: Vec<i32> = tables
            .post_tags
            .rows
            .values()
            .filter(|pt| pt.tag_id == tag_id)
            .map(|pt| pt.post_id)
            .collect();

        Self::posts_by_recency(
            tables
                .posts
                .rows
                .values()
                .filter(|p| post_ids.contains(&p.id)),
        )
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate(what: &str, value: &str) -> RepoError {
    RepoError::Constraint(format!("{what} '{value}' already exists"))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, id: i32) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .rows
            .values()
            .any(|u| u.username == user.username)
        {
            return Err(duplicate("username", &user.username));
        }

        let id = tables.users.allocate_id();
        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn has_users(&self) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(!tables.users.rows.is_empty())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::posts_by_recency(tables.posts.rows.values()))
    }

    async fn get_post(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.rows.get(&id).cloned())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.rows.values().find(|p| p.slug == slug).cloned())
    }

    async fn get_featured_post(&self) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::posts_by_recency(tables.posts.rows.values())
            .into_iter()
            .next())
    }

    async fn get_paginated_posts(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<PaginatedPosts, RepoError> {
        let tables = self.tables.read().await;
        let all = Self::posts_by_recency(tables.posts.rows.values());
        let total = all.len() as u64;
        let offset = page.saturating_sub(1).saturating_mul(limit);

        let posts = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok(PaginatedPosts { posts, total })
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.rows.values().any(|p| p.slug == post.slug) {
            return Err(duplicate("post slug", &post.slug));
        }

        let id = tables.posts.allocate_id();
        let published_at = post.published_at_or(Utc::now());
        let post = Post {
            id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            cover_image: post.cover_image,
            published_at,
            reading_time: post.reading_time,
            author_id: post.author_id,
        };
        tables.posts.rows.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i32, update: PostUpdate) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(slug) = &update.slug {
            if tables
                .posts
                .rows
                .values()
                .any(|p| p.id != id && &p.slug == slug)
            {
                return Err(duplicate("post slug", slug));
            }
        }

        let Some(post) = tables.posts.rows.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(post);
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i32) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        tables.post_tags.rows.retain(|_, pt| pt.post_id != id);
        Ok(tables.posts.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn get_all_tags(&self) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables.tags.rows.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn get_tag(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.rows.get(&id).cloned())
    }

    async fn get_tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.rows.values().find(|t| t.slug == slug).cloned())
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        for existing in tables.tags.rows.values() {
            if existing.name == tag.name {
                return Err(duplicate("tag name", &tag.name));
            }
            if existing.slug == tag.slug {
                return Err(duplicate("tag slug", &tag.slug));
            }
        }

        let id = tables.tags.allocate_id();
        let tag = Tag {
            id,
            name: tag.name,
            slug: tag.slug,
        };
        tables.tags.rows.insert(id, tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: i32, update: TagUpdate) -> Result<Option<Tag>, RepoError> {
        let mut tables = self.tables.write().await;
        for existing in tables.tags.rows.values().filter(|t| t.id != id) {
            if update.name.as_ref() == Some(&existing.name) {
                return Err(duplicate("tag name", &existing.name));
            }
            if update.slug.as_ref() == Some(&existing.slug) {
                return Err(duplicate("tag slug", &existing.slug));
            }
        }

        let Some(tag) = tables.tags.rows.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(tag);
        Ok(Some(tag.clone()))
    }

    async fn delete_tag(&self, id: i32) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        tables.post_tags.rows.retain(|_, pt| pt.tag_id != id);
        Ok(tables.tags.rows.remove(&id).is_some())
    }

    async fn add_tag_to_post(&self, post_id: i32, tag_id: i32) -> Result<PostTag, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .post_tags
            .rows
            .values()
            .find(|pt| pt.post_id == post_id && pt.tag_id == tag_id)
        {
            return Ok(existing.clone());
        }

        let id = tables.post_tags.allocate_id();
        let link = PostTag {
            id,
            post_id,
            tag_id,
        };
        tables.post_tags.rows.insert(id, link.clone());
        Ok(link)
    }

    async fn remove_tag_from_post(&self, post_id: i32, tag_id: i32) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.post_tags.rows.len();
        tables
            .post_tags
            .rows
            .retain(|_, pt| !(pt.post_id == post_id && pt.tag_id == tag_id));
        Ok(tables.post_tags.rows.len() < before)
    }

    async fn get_tags_for_post(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .post_tags
            .rows
            .values()
            .filter(|pt| pt.post_id == post_id)
            .filter_map(|pt| tables.tags.rows.get(&pt.tag_id).cloned())
            .collect())
    }

    async fn get_posts_for_tag(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::posts_with_tag(&tables, tag_id))
    }

    async fn get_posts_for_tag_slug(&self, slug: &str) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let Some(tag_id) = tables
            .tags
            .rows
            .values()
            .find(|t| t.slug == slug)
            .map(|t| t.id)
        else {
            return Ok(Vec::new());
        };
        Ok(Self::posts_with_tag(&tables, tag_id))
    }
}

#[async_trait]
impl SubscriberRepository for InMemoryStore {
    async fn create_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .subscribers
            .rows
            .values()
            .any(|s| s.email == subscriber.email)
        {
            return Err(duplicate("subscriber email", &subscriber.email));
        }

        let id = tables.subscribers.allocate_id();
        let subscriber = Subscriber {
            id,
            email: subscriber.email,
            created_at: Utc::now(),
        };
        tables.subscribers.rows.insert(id, subscriber.clone());
        Ok(subscriber)
    }

    async fn get_subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscribers
            .rows
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn get_all_subscribers(&self) -> Result<Vec<Subscriber>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.subscribers.rows.values().cloned().collect())
    }
}

impl BlogStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}
