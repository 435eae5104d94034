//! Posts and the like/unlike state machine.

use chrono::{DateTime, Utc};
use devlink_accounts::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comment::{AuthorSnapshot, Comment, CommentId};
use crate::{Result, SocialError};

/// Unique identifier for a post.
pub type PostId = Uuid;

/// One user's like on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    pub user: UserId,
}

/// A short text update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier.
    pub id: PostId,
    /// Post author.
    pub author: UserId,
    /// Author name at creation time.
    pub author_name: String,
    /// Author avatar at creation time.
    pub author_avatar: String,
    /// Post text.
    pub text: String,
    /// Likes, most recent first. Each user appears at most once.
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Comments, most recent first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Creates a new post.
    pub fn new(author: &AuthorSnapshot, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar_url.clone(),
            text: text.into(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if `user_id` wrote this post.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author == user_id
    }

    /// Returns true if `user_id` currently likes this post.
    pub fn is_liked_by(&self, user_id: UserId) -> bool {
        self.likes.iter().any(|l| l.user == user_id)
    }

    /// Unliked -> Liked. Rejected if the user already likes the post.
    pub fn like(&mut self, user_id: UserId) -> Result<()> {
        if self.is_liked_by(user_id) {
            return Err(SocialError::AlreadyLiked {
                post_id: self.id,
                user_id,
            });
        }

        self.likes.insert(0, Like { user: user_id });
        Ok(())
    }

    /// Liked -> Unliked. Rejected if the user does not like the post.
    pub fn unlike(&mut self, user_id: UserId) -> Result<()> {
        let index = self
            .likes
            .iter()
            .position(|l| l.user == user_id)
            .ok_or(SocialError::NotLiked {
                post_id: self.id,
                user_id,
            })?;

        self.likes.remove(index);
        Ok(())
    }

    /// Prepend a comment.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    /// Remove a comment written by `acting_user`.
    pub fn remove_comment(&mut self, comment_id: CommentId, acting_user: UserId) -> Result<Comment> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(SocialError::CommentNotFound(comment_id))?;

        if !self.comments[index].is_author(acting_user) {
            return Err(SocialError::NotAuthorized(acting_user));
        }

        Ok(self.comments.remove(index))
    }
}
