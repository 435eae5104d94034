//! Error types for profile and post operations.

use devlink_accounts::{FieldError, UserId};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during profile and post operations.
#[derive(Debug, Error)]
pub enum SocialError {
    /// The user has not created a profile yet.
    #[error("no profile for user: {0}")]
    ProfileNotFound(UserId),

    /// Experience entry not found on the profile.
    #[error("experience not found: {0}")]
    ExperienceNotFound(Uuid),

    /// Education entry not found on the profile.
    #[error("education not found: {0}")]
    EducationNotFound(Uuid),

    /// Post not found.
    #[error("post not found: {0}")]
    PostNotFound(Uuid),

    /// Comment not found on the post.
    #[error("comment not found: {0}")]
    CommentNotFound(Uuid),

    /// The user already likes the post.
    #[error("post {post_id} already liked by {user_id}")]
    AlreadyLiked { post_id: Uuid, user_id: UserId },

    /// The user does not like the post.
    #[error("post {post_id} not liked by {user_id}")]
    NotLiked { post_id: Uuid, user_id: UserId },

    /// Acting user is not the owner of the resource.
    #[error("user {0} is not the owner")]
    NotAuthorized(UserId),

    /// One or more input fields failed validation.
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Snapshot content is inconsistent.
    #[error("storage error: {0}")]
    Storage(String),
}

impl SocialError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ProfileNotFound(_) => 400,
            Self::ExperienceNotFound(_)
            | Self::EducationNotFound(_)
            | Self::PostNotFound(_)
            | Self::CommentNotFound(_) => 404,
            Self::AlreadyLiked { .. } | Self::NotLiked { .. } => 400,
            Self::NotAuthorized(_) => 401,
            Self::Validation(_) => 400,
            Self::Storage(_) => 500,
        }
    }

    /// Get the message shown to API clients.
    pub fn public_message(&self) -> &str {
        match self {
            Self::ProfileNotFound(_) => "There is no profile for this user",
            Self::ExperienceNotFound(_) => "Experience not found",
            Self::EducationNotFound(_) => "Education not found",
            Self::PostNotFound(_) => "Post not found",
            Self::CommentNotFound(_) => "Comment does not exist",
            Self::AlreadyLiked { .. } => "Post already liked",
            Self::NotLiked { .. } => "Post has not yet been liked",
            Self::NotAuthorized(_) => "User not authorized",
            Self::Validation(_) => "Validation failed",
            Self::Storage(_) => "Server Error",
        }
    }

    /// Field-level errors, present only for validation failures.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
