//! Comments on posts.

use chrono::{DateTime, Utc};
use devlink_accounts::{non_blank, FieldError, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, SocialError};

/// Unique identifier for a comment.
pub type CommentId = Uuid;

/// Author display data captured when a post or comment is written.
///
/// Not kept in sync with later changes to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSnapshot {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
}

impl AuthorSnapshot {
    /// Capture the author's current display data.
    pub fn new(id: UserId, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier.
    pub id: CommentId,
    /// Comment author.
    pub author: UserId,
    /// Author name at creation time.
    pub author_name: String,
    /// Author avatar at creation time.
    pub author_avatar: String,
    /// Comment text.
    pub text: String,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment.
    pub fn new(author: &AuthorSnapshot, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar_url.clone(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if `user_id` wrote this comment.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author == user_id
    }
}

/// Body of a new post or comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextInput {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextInput {
    /// Create an input from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Returns the text if it is not blank.
    pub fn validate(&self) -> Result<String> {
        // Stored untrimmed; only blank text is rejected.
        match self.text.as_deref() {
            Some(text) if non_blank(Some(text)).is_some() => Ok(text.to_string()),
            _ => Err(SocialError::Validation(vec![FieldError::missing(
                "text",
                "Text cannot be empty",
            )])),
        }
    }
}
