use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthFormView, LoginForm, NextQuery, SignupForm};
use crate::presentation::utils::{SESSION_COOKIE, redirect, request_id, safe_next};
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use tracing::info;
use validator::{Validate, ValidationError, ValidationErrors};

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(signup_form)
        .service(signup)
        .service(login_form)
        .service(login)
        .service(logout)
}

fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

fn login_redirect(
    auth: &AuthService,
    token: String,
    next: &str,
) -> Result<HttpResponse, DomainError> {
    let mut response = redirect(next);
    response
        .add_cookie(&session_cookie(token, auth.keys().ttl_seconds()))
        .map_err(|err| DomainError::Internal(format!("failed to set session cookie: {err}")))?;
    Ok(response)
}

fn taken(field: &'static str, message: &str) -> ValidationErrors {
    let mut error = ValidationError::new("unique");
    error.message = Some(message.to_string().into());
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

#[get("/signup/")]
async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(AuthFormView {
        form: SignupForm::default(),
        errors: None,
        next: None,
    })
}

#[post("/signup/")]
async fn signup(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    payload: web::Form<SignupForm>,
) -> Result<HttpResponse, DomainError> {
    let form = payload.into_inner();
    if let Err(errors) = form.validate() {
        return Ok(HttpResponse::Ok().json(AuthFormView {
            form,
            errors: Some(errors),
            next: None,
        }));
    }

    let result = auth
        .register(form.username.clone(), form.email.clone(), form.password.clone())
        .await;
    let errors = match result {
        Ok(user) => {
            info!(request_id = %request_id(&req), user_id = %user.id, "user registered");
            let token = auth.issue_token(&user)?;
            return login_redirect(&auth, token, "/");
        }
        Err(DomainError::UserAlreadyExists(_)) => {
            taken("username", "A user with that username already exists.")
        }
        Err(DomainError::EmailAlreadyRegistered(_)) => {
            taken("email", "A user with that email already exists.")
        }
        Err(err) => return Err(err),
    };

    Ok(HttpResponse::Ok().json(AuthFormView {
        form,
        errors: Some(errors),
        next: None,
    }))
}

#[get("/login/")]
async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(AuthFormView {
        form: LoginForm::default(),
        errors: None,
        next: query.into_inner().next,
    })
}

#[post("/login/")]
async fn login(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    query: web::Query<NextQuery>,
    payload: web::Form<LoginForm>,
) -> Result<HttpResponse, DomainError> {
    let form = payload.into_inner();
    let next = query.into_inner().next;

    match auth.login(&form.username, &form.password).await {
        Ok(token) => {
            info!(request_id = %request_id(&req), username = %form.username, "user logged in");
            login_redirect(&auth, token, safe_next(next.as_deref()))
        }
        Err(DomainError::Unauthorized) => {
            let mut error = ValidationError::new("invalid_login");
            error.message =
                Some("Please enter a correct username and password.".into());
            let mut errors = ValidationErrors::new();
            errors.add("__all__", error);
            Ok(HttpResponse::Ok().json(AuthFormView {
                form,
                errors: Some(errors),
                next,
            }))
        }
        Err(err) => Err(err),
    }
}

#[get("/logout/")]
async fn logout() -> Result<HttpResponse, DomainError> {
    let mut response = redirect("/");
    response
        .add_removal_cookie(&Cookie::build(SESSION_COOKIE, "").path("/").finish())
        .map_err(|err| DomainError::Internal(format!("failed to clear session cookie: {err}")))?;
    Ok(response)
}
