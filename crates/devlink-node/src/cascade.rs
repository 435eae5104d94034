//! Cascading account deletion.
//!
//! Removing a user removes everything that only exists because of them, in
//! this order:
//!
//! 1. posts they authored
//! 2. their profile
//! 3. the user record
//!
//! Every step is idempotent, so a sequence that failed partway is finished
//! by running it again. With persistence enabled the snapshot flush is part
//! of the retried sequence.

use devlink_accounts::UserId;
use serde::Serialize;
use std::future::Future;

use crate::api::{ApiError, AppState};

/// What a cascade run removed. Counts are zero on a re-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub posts_removed: usize,
    pub profile_removed: bool,
    pub user_removed: bool,
}

/// Delete a user's posts, profile and account, retrying on storage failure.
pub async fn delete_account(state: &AppState, user_id: UserId) -> Result<CascadeReport, ApiError> {
    delete_account_with(state, user_id, || state.flush()).await
}

/// Runs the cascade with `flush` as the final step of every attempt.
async fn delete_account_with<F, Fut>(
    state: &AppState,
    user_id: UserId,
    mut flush: F,
) -> Result<CascadeReport, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let mut total = CascadeReport::default();

    state
        .retry
        .execute_when(
            || {
                let report = run_steps(state, user_id);
                total.posts_removed += report.posts_removed;
                total.profile_removed |= report.profile_removed;
                total.user_removed |= report.user_removed;
                flush()
            },
            |e| matches!(e, ApiError::Persistence(_)),
        )
        .await?;

    tracing::info!(
        %user_id,
        posts_removed = total.posts_removed,
        profile_removed = total.profile_removed,
        user_removed = total.user_removed,
        "Account deleted"
    );
    Ok(total)
}

fn run_steps(state: &AppState, user_id: UserId) -> CascadeReport {
    let posts_removed = state.social.delete_posts_by_author(user_id);
    let profile_removed = state.social.delete_profile(user_id).is_some();
    let user_removed = state.accounts.users.delete(user_id).is_some();

    CascadeReport {
        posts_removed,
        profile_removed,
        user_removed,
    }
}
