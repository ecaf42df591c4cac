use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::pagination::{Page, Paginator};
use crate::domain::post::{FeedFilter, PostView};

/// Read side of the posts: paginated, newest-first listings.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    per_page: u32,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        per_page: u32,
    ) -> Self {
        Self {
            posts,
            groups,
            per_page,
        }
    }

    #[instrument(skip(self))]
    pub async fn feed(
        &self,
        filter: FeedFilter,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        let count = self.posts.count_posts(filter).await?;
        let window = Paginator::new(self.per_page, count).window(page);
        let posts = self
            .posts
            .get_posts(filter, window.limit, window.offset)
            .await?;
        Ok(Page::new(posts, window))
    }

    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostView>, DomainError> {
        self.feed(FeedFilter::All, page).await
    }

    pub async fn group(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Group, Page<PostView>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
        let page = self.feed(FeedFilter::Group(group.id), page).await?;
        Ok((group, page))
    }

    pub async fn by_author(
        &self,
        author_id: Uuid,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        self.feed(FeedFilter::Author(author_id), page).await
    }

    pub async fn followed_by(
        &self,
        user_id: Uuid,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        self.feed(FeedFilter::FollowedBy(user_id), page).await
    }
}
