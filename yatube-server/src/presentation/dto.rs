use crate::domain::comment::CommentView;
use crate::domain::group::Group;
use crate::domain::pagination::Page;
use crate::domain::post::{Post, PostView};
use crate::domain::user::Author;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required.".into());
        return Err(error);
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .any(|c| !(c.is_alphanumeric() || "@.+-_".contains(c)))
    {
        let mut error = ValidationError::new("invalid_username");
        error.message =
            Some("Letters, digits and @/./+/-/_ only.".into());
        return Err(error);
    }
    Ok(())
}

// ======================= AUTH =======================

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthFormView<T> {
    pub form: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

// ======================= POSTS =======================

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// Group id; empty means no group.
    #[serde(default)]
    pub group: Option<String>,
    /// Path of an already stored image; empty keeps the current one on edit.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub image: Option<String>,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            image: post.image.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostFormView {
    pub form: PostForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Serialize)]
pub struct CommentFormView {
    pub form: CommentForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailView {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub form: CommentFormView,
}

// ======================= FEEDS =======================

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub page_obj: Page<PostView>,
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub group: Group,
    pub page_obj: Page<PostView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub author: Author,
    pub following: bool,
    pub page_obj: Page<PostView>,
}
