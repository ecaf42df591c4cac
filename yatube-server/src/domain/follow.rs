use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge from `user_id` (the follower) to `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

impl Follow {
    /// Returns `None` for a self-follow, which the store rejects anyway.
    pub fn new(user_id: Uuid, author_id: Uuid) -> Option<Self> {
        (user_id != author_id).then(|| Self {
            id: Uuid::new_v4(),
            user_id,
            author_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_follow_is_not_constructible() {
        let me = Uuid::new_v4();
        assert!(Follow::new(me, me).is_none());
        assert!(Follow::new(me, Uuid::new_v4()).is_some());
    }
}
