//! # Devlink Node
//!
//! HTTP API server for the Devlink developer network.
//!
//! The node wires the account store (`devlink-accounts`) and the social
//! store (`devlink-social`) into a JSON API under `/api`, and optionally
//! persists both to a snapshot file.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    HTTP API Layer                    │
//! │  • Accounts: register, login, current user           │
//! │  • Profiles: upsert, experience, education, delete   │
//! │  • Posts: create, like, unlike, comment              │
//! └──────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────────────────────────────────┐
//! │                    Storage Layer                     │
//! │  • AccountStore (users, tokens)                      │
//! │  • SocialStore (profiles, posts)                     │
//! │  • JSON snapshot (optional)                          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin devlink-node -- --dev --api-addr 127.0.0.1:5000
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Shared state, error translation and the router
//! - [`account_api`] - Registration and login
//! - [`profile_api`] - Developer profiles
//! - [`post_api`] - Posts, likes and comments
//! - [`cascade`] - Account deletion
//! - [`config`] - Layered node configuration
//! - [`persistence`] - JSON snapshot file
//! - [`observability`] - Logging and request IDs
//! - [`resilience`] - Retry policy
//! - [`validation`] - Request body extraction
//!
//! ## Example
//!
//! ```rust,no_run
//! use devlink_accounts::TokenIssuer;
//! use devlink_node::api::{create_router, AppState};
//!
//! # async fn run() -> std::io::Result<()> {
//! let state = AppState::new(TokenIssuer::new(b"secret", 3600));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod account_api;
pub mod api;
pub mod cascade;
pub mod config;
pub mod extract;
pub mod observability;
pub mod persistence;
pub mod post_api;
pub mod profile_api;
pub mod resilience;
pub mod validation;
