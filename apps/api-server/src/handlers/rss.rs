//! RSS feed endpoint.

use actix_web::{HttpRequest, HttpResponse, web};

use inkwell_core::feed::{FeedChannel, render_feed};
use inkwell_core::ports::PostRepository;

use super::posts::with_tags;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Base URL for feed links: configured site URL, else scheme + Host header.
fn base_url(req: &HttpRequest, state: &AppState) -> String {
    match &state.site.url {
        Some(url) => url.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

async fn build_feed(req: &HttpRequest, state: &AppState) -> AppResult<String> {
    let posts = state.store.get_all_posts().await?;
    let posts = with_tags(state.store.as_ref(), posts).await?;

    let channel = FeedChannel::new(
        state.site.title.clone(),
        state.site.description.clone(),
        base_url(req, state),
    );

    render_feed(&channel, &posts).map_err(|e| AppError::Internal(e.to_string()))
}

/// GET /rss.xml
pub async fn rss_feed(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match build_feed(&req, &state).await {
        Ok(xml) => HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml),
        Err(e) => {
            tracing::error!("Failed to generate RSS feed: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Error generating RSS feed")
        }
    }
}
