//! End-to-end tests for profiles, posts, likes, comments and account deletion.

use axum::{body::Body, http::Request};
use devlink_accounts::TokenIssuer;
use devlink_node::api::{create_router, AppState};
use devlink_node::persistence::{Persistence, SNAPSHOT_FILE};
use devlink_node::resilience::RetryPolicy;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState::new(TokenIssuer::new(b"social-e2e-secret", 3600)).with_retry(RetryPolicy::no_retry())
}

fn create_test_app() -> axum::Router {
    create_router(test_state())
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Send a request, optionally authenticated and with a JSON body.
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    (status, json_body(response).await)
}

async fn register(app: &axum::Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, 200);
    body["token"].as_str().unwrap().to_string()
}

async fn current_user_id(app: &axum::Router, token: &str) -> String {
    let (_, user) = send(app, "GET", "/api/auth", Some(token), None).await;
    user["id"].as_str().unwrap().to_string()
}

async fn create_post(app: &axum::Router, token: &str, text: &str) -> Value {
    let (status, post) = send(
        app,
        "POST",
        "/api/posts",
        Some(token),
        Some(json!({ "text": text })),
    )
    .await;
    assert_eq!(status, 200);
    post
}

// ==================== Full Flow ====================

#[tokio::test]
async fn test_register_profile_post_like_delete_flow() {
    let app = create_test_app();

    let token_a = register(&app, "Ada", "ada@example.com").await;
    let (status, profile) = send(
        &app,
        "POST",
        "/api/profile",
        Some(&token_a),
        Some(json!({ "status": "Developer", "skills": "js, go" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(profile["skills"], json!(["js", "go"]));
    assert_eq!(profile["user"]["name"], "Ada");

    let post = create_post(&app, &token_a, "hello").await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let (status, posts) = send(&app, "GET", "/api/posts", Some(&token_a), None).await;
    assert_eq!(status, 200);
    assert_eq!(posts[0]["id"], post["id"]);
    assert_eq!(posts[0]["text"], "hello");

    let token_b = register(&app, "Bob", "bob@example.com").await;
    let b_id = current_user_id(&app, &token_b).await;
    let (status, likes) = send(
        &app,
        "PUT",
        &format!("/api/posts/like/{post_id}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(likes, json!([{ "user": b_id }]));

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/posts/{post_id}"),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["msg"], "Post Deleted");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/posts/{post_id}"),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["msg"], "Post not found");
}

// ==================== Profiles ====================

#[tokio::test]
async fn test_profile_requires_status_and_skills() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(&app, "POST", "/api/profile", Some(&token), Some(json!({}))).await;
    assert_eq!(status, 400);
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["Status is required", "Skills is required"]);
}

#[tokio::test]
async fn test_own_profile_missing() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(&app, "GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(status, 400);
    assert_eq!(body["msg"], "There is no profile for this user");
}

#[tokio::test]
async fn test_profile_update_keeps_omitted_fields() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({
            "status": "Developer",
            "skills": "rust",
            "company": "Analytical Engines",
            "githubusername": "ada",
            "twitter": "https://twitter.com/ada"
        })),
    )
    .await;

    let (status, profile) = send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Senior Developer", "company": "" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(profile["status"], "Senior Developer");
    assert_eq!(profile["company"], "Analytical Engines");
    assert_eq!(profile["githubUsername"], "ada");
    assert_eq!(profile["skills"], json!(["rust"]));
    assert_eq!(profile["social"]["twitter"], "https://twitter.com/ada");

    let (_, me) = send(&app, "GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(me["id"], profile["id"]);
}

#[tokio::test]
async fn test_list_and_get_profiles_without_auth() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    let user_id = current_user_id(&app, &token).await;
    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;

    let (status, profiles) = send(&app, "GET", "/api/profile", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(profiles.as_array().unwrap().len(), 1);
    assert_eq!(profiles[0]["user"]["id"], user_id.as_str());

    let (status, profile) = send(
        &app,
        "GET",
        &format!("/api/profile/user/{user_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(profile["userId"], user_id.as_str());
}

#[tokio::test]
async fn test_profile_by_unknown_or_malformed_user() {
    let app = create_test_app();

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let (status, body) =
            send(&app, "GET", &format!("/api/profile/user/{id}"), None, None).await;
        assert_eq!(status, 400);
        assert_eq!(body["msg"], "Profile not found");
    }
}

#[tokio::test]
async fn test_experience_add_and_remove() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;

    let (status, profile) = send(
        &app,
        "PUT",
        "/api/profile/experience",
        Some(&token),
        Some(json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01", "current": true })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(profile["experience"].as_array().unwrap().len(), 1);
    assert_eq!(profile["experience"][0]["current"], true);

    let (status, profile) = send(
        &app,
        "PUT",
        "/api/profile/experience",
        Some(&token),
        Some(json!({ "title": "Intern", "company": "Initech", "from": "2018-06-01", "to": "2019-06-01" })),
    )
    .await;
    assert_eq!(status, 200);
    let experience = profile["experience"].as_array().unwrap();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["title"], "Intern");

    let engineer_id = experience[1]["id"].as_str().unwrap().to_string();
    let (status, profile) = send(
        &app,
        "DELETE",
        &format!("/api/profile/experience/{engineer_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let experience = profile["experience"].as_array().unwrap();
    assert_eq!(experience.len(), 1);
    assert_eq!(experience[0]["title"], "Intern");

    // Unknown and malformed IDs leave the profile alone.
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/profile/experience/{engineer_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["msg"], "Experience not found");

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/profile/experience/garbage",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);

    let (_, me) = send(&app, "GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(me["experience"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_experience_validation() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/profile/experience",
        Some(&token),
        Some(json!({ "company": "Acme" })),
    )
    .await;
    assert_eq!(status, 400);
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Title is required"));
    assert!(messages.contains(&"From date is required"));
}

#[tokio::test]
async fn test_education_add_and_remove() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;
    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;

    let (status, profile) = send(
        &app,
        "PUT",
        "/api/profile/education",
        Some(&token),
        Some(json!({
            "school": "University of London",
            "degree": "BSc",
            "fieldofstudy": "Mathematics",
            "from": "1830-01-01"
        })),
    )
    .await;
    assert_eq!(status, 200);
    let education = &profile["education"][0];
    assert_eq!(education["fieldOfStudy"], "Mathematics");

    let edu_id = education["id"].as_str().unwrap().to_string();
    let (status, profile) = send(
        &app,
        "DELETE",
        &format!("/api/profile/education/{edu_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(profile["education"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/profile/education/{edu_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["msg"], "Education not found");
}

#[tokio::test]
async fn test_experience_without_profile() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/profile/experience",
        Some(&token),
        Some(json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["msg"], "There is no profile for this user");
}

// ==================== Posts ====================

#[tokio::test]
async fn test_posts_require_auth() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, 401);

    let (status, _) = send(&app, "POST", "/api/posts", None, Some(json!({ "text": "hi" }))).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_post_text_required() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/posts",
        Some(&token),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["msg"], "Text cannot be empty");
}

#[tokio::test]
async fn test_posts_listed_newest_first() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let first = create_post(&app, &token, "first").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_post(&app, &token, "second").await;

    let (_, posts) = send(&app, "GET", "/api/posts", Some(&token), None).await;
    assert_eq!(posts[0]["id"], second["id"]);
    assert_eq!(posts[1]["id"], first["id"]);
    assert_eq!(posts[0]["authorName"], "Ada");
}

#[tokio::test]
async fn test_only_author_deletes_post() {
    let app = create_test_app();
    let token_a = register(&app, "Ada", "ada@example.com").await;
    let token_b = register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &token_a, "mine").await;
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["msg"], "User not authorized");

    let (status, _) = send(&app, "GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_malformed_post_id_is_not_found() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    for (method, uri) in [
        ("GET", "/api/posts/xyz"),
        ("DELETE", "/api/posts/xyz"),
        ("PUT", "/api/posts/like/xyz"),
        ("PUT", "/api/posts/unlike/xyz"),
    ] {
        let (status, body) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, 404, "{method} {uri}");
        assert_eq!(body["msg"], "Post not found");
    }
}

// ==================== Likes ====================

#[tokio::test]
async fn test_like_and_unlike() {
    let app = create_test_app();
    let token_a = register(&app, "Ada", "ada@example.com").await;
    let token_b = register(&app, "Bob", "bob@example.com").await;
    let a_id = current_user_id(&app, &token_a).await;
    let b_id = current_user_id(&app, &token_b).await;
    let post = create_post(&app, &token_a, "likeable").await;
    let id = post["id"].as_str().unwrap();

    let like = format!("/api/posts/like/{id}");
    let unlike = format!("/api/posts/unlike/{id}");

    let (status, _) = send(&app, "PUT", &like, Some(&token_a), None).await;
    assert_eq!(status, 200);
    let (status, likes) = send(&app, "PUT", &like, Some(&token_b), None).await;
    assert_eq!(status, 200);
    // Most recent like first.
    assert_eq!(likes, json!([{ "user": b_id }, { "user": a_id }]));

    let (status, body) = send(&app, "PUT", &like, Some(&token_b), None).await;
    assert_eq!(status, 400);
    assert_eq!(body["msg"], "Post already liked");

    let (status, likes) = send(&app, "PUT", &unlike, Some(&token_b), None).await;
    assert_eq!(status, 200);
    assert_eq!(likes, json!([{ "user": a_id }]));

    let (status, body) = send(&app, "PUT", &unlike, Some(&token_b), None).await;
    assert_eq!(status, 400);
    assert_eq!(body["msg"], "Post has not yet been liked");
}

// ==================== Comments ====================

#[tokio::test]
async fn test_comment_add_and_remove() {
    let app = create_test_app();
    let token_a = register(&app, "Ada", "ada@example.com").await;
    let token_b = register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &token_a, "discuss").await;
    let post_id = post["id"].as_str().unwrap();
    let uri = format!("/api/posts/comment/{post_id}");

    let (status, comments) = send(
        &app,
        "POST",
        &uri,
        Some(&token_b),
        Some(json!({ "text": "first!" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(comments[0]["text"], "first!");
    assert_eq!(comments[0]["authorName"], "Bob");

    let (_, comments) = send(
        &app,
        "POST",
        &uri,
        Some(&token_a),
        Some(json!({ "text": "thanks" })),
    )
    .await;
    assert_eq!(comments.as_array().unwrap().len(), 2);
    assert_eq!(comments[0]["text"], "thanks");

    let bob_comment = comments[1]["id"].as_str().unwrap().to_string();
    let remove = format!("/api/posts/comment/{post_id}/{bob_comment}");

    // The post author cannot remove someone else's comment.
    let (status, body) = send(&app, "DELETE", &remove, Some(&token_a), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["msg"], "User not authorized");

    let (status, comments) = send(&app, "DELETE", &remove, Some(&token_b), None).await;
    assert_eq!(status, 200);
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["text"], "thanks");

    let (status, body) = send(&app, "DELETE", &remove, Some(&token_b), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["msg"], "Comment does not exist");
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let app = create_test_app();
    let token = register(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/posts/comment/{}", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({ "text": "hello?" })),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["msg"], "Post not found");
}

// ==================== Account Deletion ====================

#[tokio::test]
async fn test_delete_account_cascades() {
    let app = create_test_app();
    let token_a = register(&app, "Ada", "ada@example.com").await;
    let token_b = register(&app, "Bob", "bob@example.com").await;
    let a_id = current_user_id(&app, &token_a).await;

    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token_a),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;
    create_post(&app, &token_a, "one").await;
    create_post(&app, &token_a, "two").await;
    let bobs = create_post(&app, &token_b, "bob's post").await;

    let (status, body) = send(&app, "DELETE", "/api/profile", Some(&token_a), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["msg"], "User removed");

    let (_, posts) = send(&app, "GET", "/api/posts", Some(&token_b), None).await;
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], bobs["id"]);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/profile/user/{a_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth",
        None,
        Some(json!({ "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, 400);

    // The email can be registered again.
    register(&app, "Ada", "ada@example.com").await;
}

// ==================== Persistence ====================

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let state = test_state().with_persistence(Persistence::new(dir.path()));
    let app = create_router(state);
    let token = register(&app, "Ada", "ada@example.com").await;
    send(
        &app,
        "POST",
        "/api/profile",
        Some(&token),
        Some(json!({ "status": "Developer", "skills": "js, go" })),
    )
    .await;
    create_post(&app, &token, "persisted").await;
    assert!(dir.path().join(SNAPSHOT_FILE).exists());

    // Same secret, fresh stores.
    let restarted = test_state().with_persistence(Persistence::new(dir.path()));
    assert!(restarted.load_snapshot().unwrap());
    let app = create_router(restarted);

    let (status, _) = send(&app, "GET", "/api/auth", Some(&token), None).await;
    assert_eq!(status, 200);

    let (_, me) = send(&app, "GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(me["skills"], json!(["js", "go"]));

    let (_, posts) = send(&app, "GET", "/api/posts", Some(&token), None).await;
    assert_eq!(posts[0]["text"], "persisted");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth",
        None,
        Some(json!({ "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_account_deletion_is_persisted() {
    let dir = tempfile::tempdir().unwrap();

    let app = create_router(test_state().with_persistence(Persistence::new(dir.path())));
    let token = register(&app, "Ada", "ada@example.com").await;
    create_post(&app, &token, "soon gone").await;
    let (status, _) = send(&app, "DELETE", "/api/profile", Some(&token), None).await;
    assert_eq!(status, 200);

    let restarted = test_state().with_persistence(Persistence::new(dir.path()));
    restarted.load_snapshot().unwrap();
    assert_eq!(restarted.accounts.stats().users, 0);
    assert_eq!(restarted.social.stats().posts, 0);
}
