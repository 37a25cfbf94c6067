//! Newsletter subscription handler.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::NewSubscriber;
use inkwell_core::ports::SubscriberRepository;
use inkwell_shared::dto::SubscribeRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ALREADY_SUBSCRIBED: &str = "Email already subscribed";

/// POST /api/subscribe
pub async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<SubscribeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::BadRequest)?;
    let email = req.normalized_email();

    if state.store.get_subscriber_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(ALREADY_SUBSCRIBED.to_string()));
    }

    // A concurrent request can pass the check above; the store's unique
    // constraint catches it.
    let subscriber = state
        .store
        .create_subscriber(NewSubscriber::new(email))
        .await
        .map_err(|e| {
            if e.is_constraint() {
                AppError::Conflict(ALREADY_SUBSCRIBED.to_string())
            } else {
                e.into()
            }
        })?;

    tracing::info!(subscriber_id = subscriber.id, "New subscriber");
    Ok(HttpResponse::Created().json(subscriber))
}
