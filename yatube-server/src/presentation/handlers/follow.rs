use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::domain::error::DomainError;
use crate::presentation::utils::{AuthenticatedUser, profile_url, redirect};
use actix_web::{HttpResponse, get, web};

#[get("/profile/{username}/follow/")]
async fn profile_follow(
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    follows.follow(user.id, author.id).await?;
    Ok(redirect(&profile_url(&author.username)))
}

#[get("/profile/{username}/unfollow/")]
async fn profile_unfollow(
    user: AuthenticatedUser,
    auth: web::Data<AuthService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    follows.unfollow(user.id, author.id).await?;
    Ok(redirect(&profile_url(&author.username)))
}
