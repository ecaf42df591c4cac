use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::feed_service::FeedService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use crate::data::follow_repository::{FollowRepository, PostgresFollowRepository};
use crate::data::group_repository::{GroupRepository, PostgresGroupRepository};
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::infrastructure::cache::PageCache;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestIdMiddleware, SessionMiddleware, TimingMiddleware};

/// Repositories the services are built from.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            follows: Arc::new(PostgresFollowRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub feed: FeedService,
    pub posts: PostService,
    pub follows: FollowService,
    pub cache: PageCache,
}

impl AppServices {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        Self {
            auth: AuthService::new(
                repos.users,
                JwtKeys::new(config.jwt_secret.clone(), config.session_ttl_hours),
            ),
            feed: FeedService::new(
                Arc::clone(&repos.posts),
                Arc::clone(&repos.groups),
                config.posts_per_page,
            ),
            posts: PostService::new(repos.posts, repos.comments, repos.groups),
            follows: FollowService::new(repos.follows),
            cache: PageCache::new(config.index_cache_ttl),
        }
    }

    /// Shares the services with every handler.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.feed.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.follows.clone()))
            .app_data(web::Data::new(self.cache.clone()));
    }
}

pub async fn start_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(TimingMiddleware)
            .wrap(SessionMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "same-origin"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config))
            .configure(|cfg| services.configure(cfg))
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}
