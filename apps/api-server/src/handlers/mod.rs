//! HTTP handlers and route configuration.

mod health;
mod posts;
mod rss;
mod subscribe;
mod tags;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::extractor_configs;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let (json_config, query_config) = extractor_configs();

    cfg.app_data(json_config)
        .app_data(query_config)
        .route("/rss.xml", web::get().to(rss::rss_feed))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        // Registered before the slug route so it is not shadowed.
                        .route("/featured", web::get().to(posts::featured_post))
                        .route("/{slug}", web::get().to(posts::get_post)),
                )
                .service(
                    web::scope("/tags")
                        .route("", web::get().to(tags::list_tags))
                        .route("", web::post().to(tags::create_tag))
                        .route("/{slug}", web::get().to(tags::get_tag))
                        .route("/{slug}/posts", web::get().to(tags::tag_posts)),
                )
                .route("/subscribe", web::post().to(subscribe::subscribe)),
        );
}
