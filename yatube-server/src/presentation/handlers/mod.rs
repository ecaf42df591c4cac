pub mod auth;
pub mod feed;
pub mod follow;
pub mod post;

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

/// Registers every route of the site.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(auth::scope())
        .service(feed::index)
        .service(feed::group_posts)
        .service(feed::profile)
        .service(feed::follow_index)
        .service(follow::profile_follow)
        .service(follow::profile_unfollow)
        .service(post::post_detail)
        .service(post::create_form)
        .service(post::create_post)
        .service(post::edit_form)
        .service(post::edit_post)
        .service(post::add_comment);
}
