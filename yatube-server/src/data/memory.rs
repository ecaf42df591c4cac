//! In-memory repositories for tests. They share one set of tables and
//! mirror the foreign-key, unique and check constraints of the migrations.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::comment_repository::CommentRepository;
use super::follow_repository::FollowRepository;
use super::group_repository::GroupRepository;
use super::post_repository::PostRepository;
use super::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentView};
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use crate::domain::group::Group;
use crate::domain::post::{FeedFilter, Post, PostChanges, PostView};
use crate::domain::user::User;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl Tables {
    fn view(&self, post: &Post) -> PostView {
        let author = post
            .author_id
            .and_then(|id| self.users.iter().find(|u| u.id == id));
        let group = post
            .group_id
            .and_then(|id| self.groups.iter().find(|g| g.id == id));
        PostView {
            id: post.id,
            text: post.text.clone(),
            pub_date: post.pub_date,
            image: post.image.clone(),
            author_id: post.author_id,
            author_username: author.map(|u| u.username.clone()),
            group_id: post.group_id,
            group_slug: group.map(|g| g.slug.clone()),
            group_title: group.map(|g| g.title.clone()),
        }
    }

    fn matches(&self, post: &Post, filter: FeedFilter) -> bool {
        match filter {
            FeedFilter::All => true,
            FeedFilter::Group(id) => post.group_id == Some(id),
            FeedFilter::Author(id) => post.author_id == Some(id),
            FeedFilter::FollowedBy(user_id) => post.author_id.is_some_and(|author| {
                self.follows
                    .iter()
                    .any(|f| f.user_id == user_id && f.author_id == author)
            }),
        }
    }

    fn feed(&self, filter: FeedFilter) -> Vec<(usize, &Post)> {
        let mut rows: Vec<(usize, &Post)> = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| self.matches(post, filter))
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.pub_date.cmp(&a.pub_date).then(ib.cmp(ia)));
        rows
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn follow_count(&self) -> usize {
        self.lock().follows.len()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.lock().posts.iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyRegistered(user.email));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        let removed_posts: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == Some(id))
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|p| p.author_id != Some(id));
        tables
            .comments
            .retain(|c| c.author_id != id && !removed_posts.contains(&c.post_id));
        tables
            .follows
            .retain(|f| f.user_id != id && f.author_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn create(&self, group: Group) -> Result<Group, DomainError> {
        let mut tables = self.lock();
        if tables.groups.iter().any(|g| g.slug == group.slug) {
            return Err(DomainError::Internal(format!(
                "duplicate group slug: {}",
                group.slug
            )));
        }
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError> {
        Ok(self.lock().groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        Ok(self.lock().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let mut groups = self.lock().groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.groups.len();
        tables.groups.retain(|g| g.id != id);
        if tables.groups.len() == before {
            return Ok(false);
        }
        for post in tables.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.lock().posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.post(id))
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.view(p)))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let mut tables = self.lock();
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.text = changes.text;
        post.group_id = changes.group_id;
        if let Some(image) = changes.image {
            post.image = Some(image);
        }
        Ok(Some(post.clone()))
    }

    async fn count_posts(&self, filter: FeedFilter) -> Result<u64, DomainError> {
        Ok(self.lock().feed(filter).len() as u64)
    }

    async fn get_posts(
        &self,
        filter: FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .feed(filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(_, post)| tables.view(post))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut tables = self.lock();
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(DomainError::Internal("comment references missing post".into()));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let tables = self.lock();
        let mut rows: Vec<(usize, CommentView)> = tables
            .comments
            .iter()
            .enumerate()
            .filter(|(_, c)| c.post_id == post_id)
            .filter_map(|(idx, c)| {
                let author = tables.users.iter().find(|u| u.id == c.author_id)?;
                Some((
                    idx,
                    CommentView {
                        id: c.id,
                        post_id: c.post_id,
                        author_id: c.author_id,
                        author_username: author.username.clone(),
                        text: c.text.clone(),
                        created: c.created,
                    },
                ))
            })
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.created.cmp(&a.created).then(ib.cmp(ia)));
        Ok(rows.into_iter().map(|(_, view)| view).collect())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn create_if_absent(&self, follow: Follow) -> Result<bool, DomainError> {
        if follow.user_id == follow.author_id {
            return Err(DomainError::Internal(
                "violates check constraint prevent_self_follow".into(),
            ));
        }
        let mut tables = self.lock();
        if tables
            .follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.author_id == follow.author_id)
        {
            return Ok(false);
        }
        tables.follows.push(follow);
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(tables.follows.len() < before)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .lock()
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deletes_cascade_like_the_schema() {
        let store = InMemoryStore::new();
        let author = UserRepository::create(
            &store,
            User::new("author".into(), "author@example.com".into(), "hash".into()),
        )
        .await
        .unwrap();
        let reader = UserRepository::create(
            &store,
            User::new("reader".into(), "reader@example.com".into(), "hash".into()),
        )
        .await
        .unwrap();
        let group = GroupRepository::create(
            &store,
            Group::new("Cats".into(), "cats".into(), String::new()),
        )
        .await
        .unwrap();

        let kept = PostRepository::create(
            &store,
            Post::new(reader.id, "kept".into(), Some(group.id), None),
        )
        .await
        .unwrap();
        let doomed = PostRepository::create(
            &store,
            Post::new(author.id, "doomed".into(), Some(group.id), None),
        )
        .await
        .unwrap();
        CommentRepository::create(&store, Comment::new(kept.id, author.id, "by author".into()))
            .await
            .unwrap();
        CommentRepository::create(&store, Comment::new(doomed.id, reader.id, "on doomed".into()))
            .await
            .unwrap();
        FollowRepository::create_if_absent(&store, Follow::new(reader.id, author.id).unwrap())
            .await
            .unwrap();

        assert!(GroupRepository::delete(&store, group.id).await.unwrap());
        assert_eq!(store.post_count(), 2);
        assert_eq!(store.post(kept.id).unwrap().group_id, None);
        assert_eq!(store.post(doomed.id).unwrap().group_id, None);
        assert!(!GroupRepository::delete(&store, group.id).await.unwrap());

        assert!(UserRepository::delete(&store, author.id).await.unwrap());
        assert_eq!(store.post_count(), 1);
        assert!(store.post(doomed.id).is_none());
        assert_eq!(store.post(kept.id).unwrap().text, "kept");
        assert_eq!(store.comment_count(), 0);
        assert_eq!(store.follow_count(), 0);
    }
}
