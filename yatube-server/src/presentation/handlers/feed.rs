use crate::application::auth_service::AuthService;
use crate::application::feed_service::FeedService;
use crate::application::follow_service::FollowService;
use crate::domain::error::DomainError;
use crate::domain::user::Author;
use crate::infrastructure::cache::PageCache;
use crate::presentation::dto::{GroupView, IndexView, PageQuery, ProfileView};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::info;

#[get("/")]
async fn index(
    req: HttpRequest,
    feed: web::Data<FeedService>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let key = query.page.clone().unwrap_or_default();
    if let Some(body) = cache.get(&key).await {
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body));
    }

    let page_obj = feed.index(query.page.as_deref()).await?;
    let body = serde_json::to_string(&IndexView { page_obj })
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    cache.insert(key, body.clone()).await;

    info!(request_id = %request_id(&req), "index rendered");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

#[get("/group/{slug}/")]
async fn group_posts(
    feed: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let (group, page_obj) = feed.group(&slug, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(GroupView { group, page_obj }))
}

#[get("/profile/{username}/")]
async fn profile(
    viewer: Option<AuthenticatedUser>,
    auth: web::Data<AuthService>,
    feed: web::Data<FeedService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    let page_obj = feed.by_author(author.id, query.page.as_deref()).await?;
    let following = follows
        .is_following(viewer.map(|v| v.id), author.id)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileView {
        author: Author::from(&author),
        following,
        page_obj,
    }))
}

#[get("/follow/")]
async fn follow_index(
    user: AuthenticatedUser,
    feed: web::Data<FeedService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page_obj = feed.followed_by(user.id, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(IndexView { page_obj }))
}
