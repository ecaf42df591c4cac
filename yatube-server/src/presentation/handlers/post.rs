use crate::application::post_service::{EditOutcome, PostService, Submission};
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CommentForm, CommentFormView, PostDetailView, PostForm, PostFormView,
};
use crate::presentation::utils::{
    AuthenticatedUser, post_detail_url, profile_url, redirect, request_id,
};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;
use uuid::Uuid;
use validator::ValidationErrors;

async fn render_detail(
    posts: &PostService,
    post_id: Uuid,
    form: CommentForm,
    errors: Option<ValidationErrors>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(post_id).await?;
    let comments = posts.get_comments(post_id).await?;
    Ok(HttpResponse::Ok().json(PostDetailView {
        post,
        comments,
        form: CommentFormView { form, errors },
    }))
}

async fn render_form(
    posts: &PostService,
    form: PostForm,
    errors: Option<ValidationErrors>,
    post_id: Option<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let groups = posts.groups().await?;
    Ok(HttpResponse::Ok().json(PostFormView {
        form,
        errors,
        is_edit: post_id.is_some(),
        post_id,
        groups,
    }))
}

#[get("/posts/{id}/")]
async fn post_detail(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    render_detail(&posts, path.into_inner(), CommentForm::default(), None).await
}

#[get("/create/")]
async fn create_form(
    _user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    render_form(&posts, PostForm::default(), None, None).await
}

#[post("/create/")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let form = payload.into_inner();
    match posts.create_post(user.id, form.clone()).await? {
        Submission::Saved(post) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post.id,
                "post created"
            );
            Ok(redirect(&profile_url(&user.username)))
        }
        Submission::Invalid(errors) => render_form(&posts, form, Some(errors), None).await,
    }
}

#[get("/posts/{id}/edit/")]
async fn edit_form(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    match posts.post_for_edit(user.id, post_id).await? {
        Some(post) => render_form(&posts, PostForm::from(&post), None, Some(post_id)).await,
        None => Ok(redirect(&post_detail_url(post_id))),
    }
}

#[post("/posts/{id}/edit/")]
async fn edit_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    payload: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let form = payload.into_inner();
    match posts.update_post(user.id, post_id, form.clone()).await? {
        EditOutcome::Saved(post) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post.id,
                "post updated"
            );
            Ok(redirect(&post_detail_url(post_id)))
        }
        EditOutcome::NotAuthor => Ok(redirect(&post_detail_url(post_id))),
        EditOutcome::Invalid(errors) => {
            render_form(&posts, form, Some(errors), Some(post_id)).await
        }
    }
}

#[post("/posts/{id}/comment/")]
async fn add_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    payload: web::Form<CommentForm>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let form = payload.into_inner();
    match posts.add_comment(user.id, post_id, form.clone()).await? {
        Submission::Saved(comment) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                comment_id = %comment.id,
                "comment added"
            );
            Ok(redirect(&post_detail_url(post_id)))
        }
        Submission::Invalid(errors) => render_detail(&posts, post_id, form, Some(errors)).await,
    }
}
