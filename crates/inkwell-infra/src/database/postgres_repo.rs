//! PostgreSQL implementation of the blog store.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use inkwell_core::domain::{
    NewPost, NewSubscriber, NewTag, NewUser, PaginatedPosts, Post, PostTag, PostUpdate, Subscriber,
    Tag, TagUpdate, User,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BlogStore, PostRepository, SubscriberRepository, TagRepository, UserRepository,
};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::subscriber::{self, Entity as SubscriberEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{find_by_id, map_db_err, mask_email};

/// Blog store backed by PostgreSQL through SeaORM.
pub struct PostgresStore {
    pub(super) db: DbConn,
}

impl PostgresStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Row offset of a page, or `None` when it cannot be bound as a Postgres `BIGINT`.
fn page_offset(page: u64, limit: u64) -> Option<u64> {
    page.saturating_sub(1)
        .checked_mul(limit)
        .filter(|offset| i64::try_from(*offset).is_ok())
}

fn collect<M, T: From<M>>(rows: Vec<M>) -> Vec<T> {
    rows.into_iter().map(Into::into).collect()
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get_user(&self, id: i32) -> Result<Option<User>, RepoError> {
        find_by_id::<UserEntity, _, _>(&self.db, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            username: Set(new_user.username),
            password: Set(new_user.password),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn has_users(&self) -> Result<bool, RepoError> {
        let first = UserEntity::find()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(first.is_some())
    }
}

#[async_trait]
impl PostRepository for PostgresStore {
    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }

    async fn get_post(&self, id: i32) -> Result<Option<Post>, RepoError> {
        find_by_id::<PostEntity, _, _>(&self.db, id).await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn get_featured_post(&self) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn get_paginated_posts(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<PaginatedPosts, RepoError> {
        let total = PostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        // Past any reachable row: same empty page the in-memory store returns.
        let Some(offset) = page_offset(page, limit) else {
            return Ok(PaginatedPosts {
                posts: Vec::new(),
                total,
            });
        };

        let rows = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(PaginatedPosts {
            posts: collect(rows),
            total,
        })
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let published_at = new_post.published_at_or(Utc::now());

        let model = post::ActiveModel {
            slug: Set(new_post.slug),
            title: Set(new_post.title),
            excerpt: Set(new_post.excerpt),
            content: Set(new_post.content),
            cover_image: Set(new_post.cover_image),
            published_at: Set(published_at.into()),
            reading_time: Set(new_post.reading_time),
            author_id: Set(new_post.author_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, slug = %model.slug, "Post created");
        Ok(model.into())
    }

    async fn update_post(&self, id: i32, update: PostUpdate) -> Result<Option<Post>, RepoError> {
        let Some(existing) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(existing.into()));
        }

        let mut active: post::ActiveModel = existing.into();
        if let Some(slug) = update.slug {
            active.slug = Set(slug);
        }
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(excerpt) = update.excerpt {
            active.excerpt = Set(excerpt);
        }
        if let Some(content) = update.content {
            active.content = Set(content);
        }
        if let Some(cover_image) = update.cover_image {
            active.cover_image = Set(cover_image);
        }
        if let Some(published_at) = update.published_at {
            active.published_at = Set(published_at.into());
        }
        if let Some(reading_time) = update.reading_time {
            active.reading_time = Set(reading_time);
        }
        if let Some(author_id) = update.author_id {
            active.author_id = Set(author_id);
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(model.into()))
    }

    async fn delete_post(&self, id: i32) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Join rows first: post_tags.post_id references posts.id.
        let links = PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(
            post_id = id,
            removed_links = links.rows_affected,
            deleted = result.rows_affected > 0,
            "Post delete finished"
        );
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl TagRepository for PostgresStore {
    async fn get_all_tags(&self) -> Result<Vec<Tag>, RepoError> {
        let rows = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }

    async fn get_tag(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        find_by_id::<TagEntity, _, _>(&self.db, id).await
    }

    async fn get_tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel {
            name: Set(new_tag.name),
            slug: Set(new_tag.slug),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update_tag(&self, id: i32, update: TagUpdate) -> Result<Option<Tag>, RepoError> {
        let Some(existing) = TagEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        if update.name.is_none() && update.slug.is_none() {
            return Ok(Some(existing.into()));
        }

        let mut active: tag::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(slug) = update.slug {
            active.slug = Set(slug);
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(model.into()))
    }

    async fn delete_tag(&self, id: i32) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = TagEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn add_tag_to_post(&self, post_id: i32, tag_id: i32) -> Result<PostTag, RepoError> {
        let existing = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .filter(post_tag::Column::TagId.eq(tag_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        if let Some(link) = existing {
            return Ok(link.into());
        }

        let model = post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn remove_tag_from_post(&self, post_id: i32, tag_id: i32) -> Result<bool, RepoError> {
        let result = PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .filter(post_tag::Column::TagId.eq(tag_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn get_tags_for_post(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let rows = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(post_tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }

    async fn get_posts_for_tag(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }

    async fn get_posts_for_tag_slug(&self, slug: &str) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .inner_join(PostTagEntity)
            .join(JoinType::InnerJoin, post_tag::Relation::Tag.def())
            .filter(tag::Column::Slug.eq(slug))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }
}

#[async_trait]
impl SubscriberRepository for PostgresStore {
    async fn create_subscriber(
        &self,
        new_subscriber: NewSubscriber,
    ) -> Result<Subscriber, RepoError> {
        tracing::debug!(email = %mask_email(&new_subscriber.email), "Creating subscriber");

        let model = subscriber::ActiveModel {
            email: Set(new_subscriber.email),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn get_subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, RepoError> {
        tracing::debug!(email = %mask_email(email), "Finding subscriber by email");

        let result = SubscriberEntity::find()
            .filter(subscriber::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn get_all_subscribers(&self) -> Result<Vec<Subscriber>, RepoError> {
        let rows = SubscriberEntity::find()
            .order_by_asc(subscriber::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(collect(rows))
    }
}

impl BlogStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}
