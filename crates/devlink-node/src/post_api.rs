//! Post, like and comment endpoints. Every route requires a bearer token.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use devlink_social::{Comment, Like, Post, TextInput};
use uuid::Uuid;

use crate::api::{ApiError, AppState, MessageResponse};
use crate::extract::AuthUser;
use crate::validation::{parse_id, ValidJson};

const POST_NOT_FOUND: ApiError = ApiError::NotFound("Post not found");

/// Creates the post routes.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/{id}", get(get_post).delete(delete_post))
        .route("/api/posts/like/{id}", put(like_post))
        .route("/api/posts/unlike/{id}", put(unlike_post))
        .route("/api/posts/comment/{id}", post(add_comment))
        .route(
            "/api/posts/comment/{id}/{comment_id}",
            delete(remove_comment),
        )
}

fn post_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw).ok_or(POST_NOT_FOUND)
}

/// Lists posts, newest first.
async fn list_posts(State(state): State<AppState>, _user: AuthUser) -> Json<Vec<Post>> {
    Json(state.social.list_posts())
}

/// Creates a post as the caller.
async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<TextInput>,
) -> Result<Json<Post>, ApiError> {
    let post = state.social.create_post(&user.snapshot(), &input)?;
    Ok(Json(post))
}

/// Gets a post by ID.
async fn get_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.social.get_post(post_id(&id)?)?;
    Ok(Json(post))
}

/// Deletes a post owned by the caller.
async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.social.delete_post(post_id(&id)?, user.id)?;
    Ok(Json(MessageResponse::new("Post Deleted")))
}

/// Likes a post. Returns the updated likes.
async fn like_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let likes = state.social.like(post_id(&id)?, user.id)?;
    Ok(Json(likes))
}

/// Removes the caller's like. Returns the updated likes.
async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let likes = state.social.unlike(post_id(&id)?, user.id)?;
    Ok(Json(likes))
}

/// Comments on a post. Returns the updated comments.
async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<TextInput>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state
        .social
        .add_comment(post_id(&id)?, &user.snapshot(), &input)?;
    Ok(Json(comments))
}

/// Removes one of the caller's comments. Returns the updated comments.
async fn remove_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = post_id(&id)?;
    let comment_id =
        parse_id(&comment_id).ok_or(ApiError::NotFound("Comment does not exist"))?;

    let comments = state.social.remove_comment(post_id, comment_id, user.id)?;
    Ok(Json(comments))
}
