//! In-memory storage for profiles and posts.

use devlink_accounts::UserId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    AuthorSnapshot, Comment, CommentId, EducationInput, EntryId, ExperienceInput, Like, Post,
    PostId, Profile, ProfileFields, Result, SocialError, TextInput,
};

/// In-memory store for profiles and posts.
///
/// Every read-modify-write runs under the collection's write lock, so
/// concurrent updates to the same document never lose each other.
#[derive(Default)]
pub struct SocialStore {
    /// Profiles indexed by owning user.
    profiles: RwLock<HashMap<UserId, Profile>>,
    /// Posts indexed by id.
    posts: RwLock<HashMap<PostId, Post>>,
}

impl SocialStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Profiles ====================

    /// Gets the profile owned by a user.
    pub fn get_profile(&self, user_id: UserId) -> Result<Profile> {
        self.profiles
            .read()
            .get(&user_id)
            .cloned()
            .ok_or(SocialError::ProfileNotFound(user_id))
    }

    /// Lists all profiles, oldest first.
    pub fn list_profiles(&self) -> Vec<Profile> {
        let mut profiles: Vec<_> = self.profiles.read().values().cloned().collect();
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        profiles
    }

    /// Creates the user's profile, or applies a partial update to it.
    pub fn upsert_profile(&self, user_id: UserId, fields: &ProfileFields) -> Result<Profile> {
        let mut profiles = self.profiles.write();

        if let Some(profile) = profiles.get_mut(&user_id) {
            profile.apply(fields);
            tracing::debug!(%user_id, "Profile updated");
            return Ok(profile.clone());
        }

        let profile = Profile::create(user_id, fields)?;
        profiles.insert(user_id, profile.clone());
        tracing::info!(%user_id, profile_id = %profile.id, "Profile created");
        Ok(profile)
    }

    /// Updates a profile.
    pub fn update_profile<F>(&self, user_id: UserId, f: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        let mut profiles = self.profiles.write();

        let profile = profiles
            .get_mut(&user_id)
            .ok_or(SocialError::ProfileNotFound(user_id))?;

        f(profile)?;
        Ok(profile.clone())
    }

    /// Validates and prepends an experience entry.
    pub fn add_experience(&self, user_id: UserId, input: &ExperienceInput) -> Result<Profile> {
        let entry = input.validate()?;
        self.update_profile(user_id, |p| {
            p.add_experience(entry);
            Ok(())
        })
    }

    /// Removes an experience entry by its own ID.
    pub fn remove_experience(&self, user_id: UserId, entry_id: EntryId) -> Result<Profile> {
        self.update_profile(user_id, |p| p.remove_experience(entry_id).map(drop))
    }

    /// Validates and prepends an education entry.
    pub fn add_education(&self, user_id: UserId, input: &EducationInput) -> Result<Profile> {
        let entry = input.validate()?;
        self.update_profile(user_id, |p| {
            p.add_education(entry);
            Ok(())
        })
    }

    /// Removes an education entry by its own ID.
    pub fn remove_education(&self, user_id: UserId, entry_id: EntryId) -> Result<Profile> {
        self.update_profile(user_id, |p| p.remove_education(entry_id).map(drop))
    }

    /// Deletes the user's profile. Returns `None` if there was none.
    pub fn delete_profile(&self, user_id: UserId) -> Option<Profile> {
        self.profiles.write().remove(&user_id)
    }

    // ==================== Posts ====================

    /// Creates a new post.
    pub fn create_post(&self, author: &AuthorSnapshot, input: &TextInput) -> Result<Post> {
        let text = input.validate()?;
        let post = Post::new(author, text);

        self.posts.write().insert(post.id, post.clone());
        tracing::debug!(post_id = %post.id, user_id = %author.id, "Post created");
        Ok(post)
    }

    /// Gets a post by id.
    pub fn get_post(&self, post_id: PostId) -> Result<Post> {
        self.posts
            .read()
            .get(&post_id)
            .cloned()
            .ok_or(SocialError::PostNotFound(post_id))
    }

    /// Lists posts, newest first.
    pub fn list_posts(&self) -> Vec<Post> {
        let mut posts: Vec<_> = self.posts.read().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    /// Updates a post.
    pub fn update_post<F, T>(&self, post_id: PostId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Post) -> Result<T>,
    {
        let mut posts = self.posts.write();

        let post = posts
            .get_mut(&post_id)
            .ok_or(SocialError::PostNotFound(post_id))?;

        f(post)
    }

    /// Deletes a post owned by `acting_user`.
    pub fn delete_post(&self, post_id: PostId, acting_user: UserId) -> Result<Post> {
        let mut posts = self.posts.write();

        let post = posts
            .get(&post_id)
            .ok_or(SocialError::PostNotFound(post_id))?;
        if !post.is_author(acting_user) {
            return Err(SocialError::NotAuthorized(acting_user));
        }

        let removed = posts
            .remove(&post_id)
            .ok_or(SocialError::PostNotFound(post_id))?;
        tracing::debug!(%post_id, user_id = %acting_user, "Post deleted");
        Ok(removed)
    }

    /// Likes a post. Returns the updated likes.
    pub fn like(&self, post_id: PostId, user_id: UserId) -> Result<Vec<Like>> {
        self.update_post(post_id, |post| {
            post.like(user_id)?;
            Ok(post.likes.clone())
        })
    }

    /// Removes a like. Returns the updated likes.
    pub fn unlike(&self, post_id: PostId, user_id: UserId) -> Result<Vec<Like>> {
        self.update_post(post_id, |post| {
            post.unlike(user_id)?;
            Ok(post.likes.clone())
        })
    }

    /// Prepends a comment. Returns the updated comments.
    pub fn add_comment(
        &self,
        post_id: PostId,
        author: &AuthorSnapshot,
        input: &TextInput,
    ) -> Result<Vec<Comment>> {
        let text = input.validate()?;
        self.update_post(post_id, |post| {
            post.add_comment(Comment::new(author, text));
            Ok(post.comments.clone())
        })
    }

    /// Removes a comment written by `acting_user`. Returns the updated comments.
    pub fn remove_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        acting_user: UserId,
    ) -> Result<Vec<Comment>> {
        self.update_post(post_id, |post| {
            post.remove_comment(comment_id, acting_user)?;
            Ok(post.comments.clone())
        })
    }

    /// Deletes every post written by a user. Returns how many were removed.
    pub fn delete_posts_by_author(&self, user_id: UserId) -> usize {
        let mut posts = self.posts.write();
        let before = posts.len();
        posts.retain(|_, post| !post.is_author(user_id));
        before - posts.len()
    }

    // ==================== Snapshots ====================

    /// Copies every collection.
    pub fn snapshot(&self) -> SocialSnapshot {
        SocialSnapshot {
            profiles: self.list_profiles(),
            posts: self.list_posts(),
        }
    }

    /// Replaces every collection with the snapshot's content.
    pub fn restore(&self, snapshot: SocialSnapshot) -> Result<()> {
        let mut profiles = HashMap::with_capacity(snapshot.profiles.len());
        for profile in snapshot.profiles {
            let user_id = profile.user_id;
            if profiles.insert(user_id, profile).is_some() {
                return Err(SocialError::Storage(format!(
                    "more than one profile for user {}",
                    user_id
                )));
            }
        }

        let mut posts = HashMap::with_capacity(snapshot.posts.len());
        for post in snapshot.posts {
            let post_id = post.id;
            if posts.insert(post_id, post).is_some() {
                return Err(SocialError::Storage(format!("duplicate post {}", post_id)));
            }
        }

        *self.profiles.write() = profiles;
        *self.posts.write() = posts;
        Ok(())
    }

    /// Get statistics about stored data.
    pub fn stats(&self) -> SocialStats {
        let posts = self.posts.read();
        SocialStats {
            profiles: self.profiles.read().len(),
            posts: posts.len(),
            comments: posts.values().map(|p| p.comments.len()).sum(),
        }
    }
}

/// Serializable copy of the profile and post collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialSnapshot {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Statistics about stored data.
#[derive(Debug, Clone, Serialize)]
pub struct SocialStats {
    pub profiles: usize,
    pub posts: usize,
    pub comments: usize,
}
