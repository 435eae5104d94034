//! Profile endpoints.
//!
//! Profiles are served with a `user: {id, name, avatarUrl}` block looked up
//! from the account store at read time.

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Extension, Json, Router,
};
use devlink_accounts::{AccountStore, UserId};
use devlink_social::{
    EducationInput, ExperienceInput, Profile, ProfileFields, ProfileOwner, ProfileView,
    SocialError,
};

use crate::api::{ApiError, AppState, MessageResponse};
use crate::cascade::delete_account;
use crate::extract::AuthUser;
use crate::persistence::SnapshotFlushed;
use crate::validation::{parse_id, ValidJson};

/// Creates the profile routes.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/profile",
            get(list_profiles)
                .post(upsert_profile)
                .delete(delete_own_account),
        )
        .route("/api/profile/me", get(get_own_profile))
        .route("/api/profile/user/{user_id}", get(get_profile_by_user))
        .route("/api/profile/experience", put(add_experience))
        .route("/api/profile/experience/{exp_id}", delete(remove_experience))
        .route("/api/profile/education", put(add_education))
        .route("/api/profile/education/{edu_id}", delete(remove_education))
}

fn owner_of(accounts: &AccountStore, user_id: UserId) -> Option<ProfileOwner> {
    accounts.users.get(user_id).map(|u| ProfileOwner {
        id: u.id,
        name: u.name,
        avatar_url: u.avatar_url,
    })
}

fn view(state: &AppState, profile: Profile) -> ProfileView {
    let owner = owner_of(&state.accounts, profile.user_id);
    profile.with_owner(owner)
}

/// Gets the caller's own profile.
async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.social.get_profile(user.id)?;
    Ok(Json(view(&state, profile)))
}

/// Creates or updates the caller's profile.
async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(fields): ValidJson<ProfileFields>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.social.upsert_profile(user.id, &fields)?;
    Ok(Json(view(&state, profile)))
}

/// Lists every profile.
async fn list_profiles(State(state): State<AppState>) -> Json<Vec<ProfileView>> {
    let profiles = state
        .social
        .list_profiles()
        .into_iter()
        .map(|p| view(&state, p))
        .collect();
    Json(profiles)
}

/// Gets the profile of any user.
async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    const NOT_FOUND: ApiError = ApiError::BadRequest("Profile not found");

    let user_id = parse_id(&user_id).ok_or(NOT_FOUND)?;
    let profile = state.social.get_profile(user_id).map_err(|e| match e {
        SocialError::ProfileNotFound(_) => NOT_FOUND,
        other => other.into(),
    })?;
    Ok(Json(view(&state, profile)))
}

/// Deletes the caller's posts, profile and account.
async fn delete_own_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<(Extension<SnapshotFlushed>, Json<MessageResponse>), ApiError> {
    delete_account(&state, user.id).await?;
    Ok((
        Extension(SnapshotFlushed),
        Json(MessageResponse::new("User removed")),
    ))
}

/// Adds an experience entry to the caller's profile.
async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(input): ValidJson<ExperienceInput>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.social.add_experience(user.id, &input)?;
    Ok(Json(view(&state, profile)))
}

/// Removes an experience entry from the caller's profile.
async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let exp_id = parse_id(&exp_id).ok_or(ApiError::NotFound("Experience not found"))?;
    let profile = state.social.remove_experience(user.id, exp_id)?;
    Ok(Json(view(&state, profile)))
}

/// Adds an education entry to the caller's profile.
async fn add_education(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(input): ValidJson<EducationInput>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.social.add_education(user.id, &input)?;
    Ok(Json(view(&state, profile)))
}

/// Removes an education entry from the caller's profile.
async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let edu_id = parse_id(&edu_id).ok_or(ApiError::NotFound("Education not found"))?;
    let profile = state.social.remove_education(user.id, edu_id)?;
    Ok(Json(view(&state, profile)))
}
