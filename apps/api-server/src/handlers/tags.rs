//! Tag handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::NewTag;
use inkwell_core::ports::TagRepository;
use inkwell_core::error::DomainError;
use inkwell_core::slug::{is_valid_slug, slugify};
use inkwell_shared::dto::CreateTagRequest;

use super::posts::with_tags;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.store.get_all_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// GET /api/tags/{slug}
pub async fn get_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let tag = state
        .store
        .get_tag_by_slug(&slug)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "Tag",
            key: slug,
        })?;

    Ok(HttpResponse::Ok().json(tag))
}

/// GET /api/tags/{slug}/posts
pub async fn tag_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    if state.store.get_tag_by_slug(&slug).await?.is_none() {
        return Err(DomainError::NotFound {
            entity_type: "Tag",
            key: slug,
        }
        .into());
    }

    let posts = state.store.get_posts_for_tag_slug(&slug).await?;
    let posts = with_tags(state.store.as_ref(), posts).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/tags
pub async fn create_tag(
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let name = req.name.trim().to_string();
    let slug = match req.slug {
        Some(slug) if !is_valid_slug(&slug) => {
            return Err(AppError::BadRequest(
                "slug may only contain lowercase letters, digits and single dashes".to_string(),
            ));
        }
        Some(slug) => slug,
        None => slugify(&name)?,
    };

    if state.store.get_tag_by_slug(&slug).await?.is_some() {
        return Err(DomainError::Duplicate(format!(
            "A tag with slug '{}' already exists",
            slug
        ))
        .into());
    }

    let tag = state
        .store
        .create_tag(NewTag { name, slug })
        .await
        .map_err(|e| {
            if e.is_constraint() {
                AppError::Conflict("Tag already exists".to_string())
            } else {
                e.into()
            }
        })?;

    Ok(HttpResponse::Created().json(tag))
}
