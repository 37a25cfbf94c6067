//! Post handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{NewPost, PaginatedPosts, Post, PostWithTags};
use inkwell_core::ports::{BlogStore, PostRepository, TagRepository, UserRepository};
use inkwell_core::error::DomainError;
use inkwell_core::slug::{is_valid_slug, slugify};
use inkwell_shared::dto::{CreatePostRequest, PageQuery, Pagination, PostListResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Attach tags to each post, one tag query per post.
// TODO: batch into a single post_tags join once the listing page size grows.
pub(crate) async fn with_tags(
    store: &dyn BlogStore,
    posts: Vec<Post>,
) -> AppResult<Vec<PostWithTags>> {
    let mut out = Vec::with_capacity(posts.len());
    for post in posts {
        let tags = store.get_tags_for_post(post.id).await?;
        out.push(PostWithTags::new(post, tags));
    }
    Ok(out)
}

/// GET /api/posts?page&limit
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (page, limit) = query.resolve().map_err(AppError::BadRequest)?;

    let PaginatedPosts { posts, total } = state.store.get_paginated_posts(page, limit).await?;
    let posts = with_tags(state.store.as_ref(), posts).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        pagination: Pagination::new(total, page, limit),
    }))
}

/// GET /api/posts/featured
pub async fn featured_post(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let post = state
        .store
        .get_featured_post()
        .await?
        .ok_or_else(|| AppError::NotFound("No posts published yet".to_string()))?;

    let tags = state.store.get_tags_for_post(post.id).await?;
    Ok(HttpResponse::Ok().json(PostWithTags::new(post, tags)))
}

/// GET /api/posts/{slug}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .store
        .get_post_by_slug(&slug)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "Post",
            key: slug,
        })?;

    let tags = state.store.get_tags_for_post(post.id).await?;
    Ok(HttpResponse::Ok().json(PostWithTags::new(post, tags)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let slug = match &req.slug {
        Some(slug) if !is_valid_slug(slug) => {
            return Err(AppError::BadRequest(
                "slug may only contain lowercase letters, digits and single dashes".to_string(),
            ));
        }
        Some(slug) => slug.clone(),
        None => slugify(&req.title)?,
    };

    if state.store.get_post_by_slug(&slug).await?.is_some() {
        return Err(DomainError::Duplicate(format!(
            "A post with slug '{}' already exists",
            slug
        ))
        .into());
    }

    if let Some(author_id) = req.author_id {
        if state.store.get_user(author_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Author {} does not exist",
                author_id
            )));
        }
    }

    let post = state
        .store
        .create_post(NewPost {
            slug,
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            cover_image: req.cover_image,
            published_at: req.published_at,
            reading_time: req.reading_time,
            author_id: req.author_id,
        })
        .await?;

    tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
    Ok(HttpResponse::Created().json(post))
}
