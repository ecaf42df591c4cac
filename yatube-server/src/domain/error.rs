use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub const LOGIN_URL: &str = "/auth/login/";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("email already registered: {0}")]
    EmailAlreadyRegistered(String),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("unauthorized")]
    Unauthorized,
    #[error("login required")]
    LoginRequired { next: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Login page location carrying the path (and query) to come back to.
    /// Slashes stay readable; everything else outside the unreserved set is
    /// percent-encoded.
    pub fn login_location(next: &str) -> String {
        let encoded = urlencoding::encode(next).replace("%2F", "/");
        format!("{}?next={}", LOGIN_URL, encoded)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::GroupNotFound(_)
            | DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::LoginRequired { .. } => StatusCode::FOUND,
            DomainError::UserAlreadyExists(_) | DomainError::EmailAlreadyRegistered(_) => {
                StatusCode::CONFLICT
            }
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::LoginRequired { next } = self {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, Self::login_location(next)))
                .finish();
        }

        let message = self.to_string();
        let details = match self {
            DomainError::PostNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::UserNotFound(resource) | DomainError::GroupNotFound(resource) => {
                Some(json!({ "resource": resource }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
