//! Profiles and posts for the Devlink developer network.
//!
//! This crate provides the documents users publish about themselves
//! (profiles with experience, education and social links) and to each other
//! (posts with likes and comments), together with thread-safe storage.
//!
//! Posts and comments carry a snapshot of their author's name and avatar
//! taken at creation time; later changes to the user are not reflected.

mod comment;
mod error;
mod post;
mod profile;
mod store;

pub use comment::{AuthorSnapshot, Comment, CommentId, TextInput};
pub use error::SocialError;
pub use post::{Like, Post, PostId};
pub use profile::{
    parse_date, parse_skills, Education, EducationInput, EntryId, Experience, ExperienceInput,
    Profile, ProfileFields, ProfileId, ProfileOwner, ProfileView, SocialLinks,
};
pub use store::{SocialSnapshot, SocialStats, SocialStore};

/// Result type for profile and post operations.
pub type Result<T> = std::result::Result<T, SocialError>;
