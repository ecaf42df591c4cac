use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::data::follow_repository::FollowRepository;
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;

#[derive(Clone)]
pub struct FollowService {
    repo: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn FollowRepository>) -> Self {
        Self { repo }
    }

    /// Idempotent; following oneself is a no-op. Returns true if a row was added.
    #[instrument(skip(self))]
    pub async fn follow(&self, follower: Uuid, author: Uuid) -> Result<bool, DomainError> {
        let Some(follow) = Follow::new(follower, author) else {
            debug!("ignoring self-follow");
            return Ok(false);
        };
        self.repo.create_if_absent(follow).await
    }

    /// Idempotent; returns true if a row was removed.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, follower: Uuid, author: Uuid) -> Result<bool, DomainError> {
        if follower == author {
            return Ok(false);
        }
        self.repo.delete(follower, author).await
    }

    /// Follow-state flag for a profile page.
    pub async fn is_following(
        &self,
        viewer: Option<Uuid>,
        author: Uuid,
    ) -> Result<bool, DomainError> {
        match viewer {
            Some(viewer) if viewer != author => self.repo.exists(viewer, author).await,
            _ => Ok(false),
        }
    }
}
