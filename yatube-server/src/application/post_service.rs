use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::post::{Post, PostChanges, PostView};
use crate::presentation::dto::{CommentForm, PostForm};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Result of a form submission that passed or failed validation.
#[derive(Debug)]
pub enum Submission<T> {
    Saved(T),
    Invalid(ValidationErrors),
}

#[derive(Debug)]
pub enum EditOutcome {
    Saved(Post),
    Invalid(ValidationErrors),
    NotAuthor,
}

struct CleanPost {
    text: String,
    group_id: Option<Uuid>,
    image: Option<String>,
}

fn invalid_choice() -> ValidationError {
    let mut error = ValidationError::new("invalid_choice");
    error.message = Some("Select a valid choice.".into());
    error
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            groups,
        }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostView, DomainError> {
        self.posts
            .find_view(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        self.groups.list().await
    }

    /// The post if `actor` may edit it, `None` if somebody else wrote it.
    pub async fn post_for_edit(&self, actor: Uuid, id: Uuid) -> Result<Option<Post>, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))?;
        Ok(post.is_authored_by(actor).then_some(post))
    }

    async fn clean_post(&self, form: PostForm) -> Result<Result<CleanPost, ValidationErrors>, DomainError> {
        let mut errors = form.validate().err();

        let group_id = match form.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let known = match Uuid::parse_str(raw) {
                    Ok(id) => self.groups.find_by_id(id).await?.map(|g| g.id),
                    Err(_) => None,
                };
                if known.is_none() {
                    errors
                        .get_or_insert_with(ValidationErrors::new)
                        .add("group", invalid_choice());
                }
                known
            }
        };

        if let Some(errors) = errors {
            return Ok(Err(errors));
        }

        Ok(Ok(CleanPost {
            text: form.text.trim().to_string(),
            group_id,
            image: form.image.filter(|path| !path.trim().is_empty()),
        }))
    }

    #[instrument(skip(self, form))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        form: PostForm,
    ) -> Result<Submission<Post>, DomainError> {
        let clean = match self.clean_post(form).await? {
            Ok(clean) => clean,
            Err(errors) => return Ok(Submission::Invalid(errors)),
        };
        let post = Post::new(author_id, clean.text, clean.group_id, clean.image);
        Ok(Submission::Saved(self.posts.create(post).await?))
    }

    #[instrument(skip(self, form))]
    pub async fn update_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<EditOutcome, DomainError> {
        if self.post_for_edit(actor, post_id).await?.is_none() {
            info!(post_id = %post_id, user_id = %actor, "edit refused for non-author");
            return Ok(EditOutcome::NotAuthor);
        }
        let clean = match self.clean_post(form).await? {
            Ok(clean) => clean,
            Err(errors) => return Ok(EditOutcome::Invalid(errors)),
        };
        let changes = PostChanges {
            text: clean.text,
            group_id: clean.group_id,
            image: clean.image,
        };
        match self.posts.update_post(post_id, changes).await? {
            Some(post) => Ok(EditOutcome::Saved(post)),
            None => Err(DomainError::PostNotFound(post_id)),
        }
    }

    #[instrument(skip(self, form))]
    pub async fn add_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<Submission<Comment>, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id));
        }
        if let Err(errors) = form.validate() {
            return Ok(Submission::Invalid(errors));
        }
        let comment = Comment::new(post_id, author_id, form.text.trim().to_string());
        Ok(Submission::Saved(self.comments.create(comment).await?))
    }
}
