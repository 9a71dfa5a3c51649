use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::{user_repo, watch_history_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{UserResponse, WatchHistoryEntry};
use crate::response::{ApiResponse, Page, PageParams};

/// GET /api/v1/users/me
pub async fn me(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(pool.get_ref(), user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(ApiResponse::ok(
        "Current user fetched successfully",
        UserResponse::from(user),
    ))
}

/// GET /api/v1/users/c/{username}
///
/// Channel page: profile fields plus subscription-derived counts and the
/// viewer's `is_subscribed` flag, computed in one query.
pub async fn channel(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    if username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }

    let profile = user_repo::channel_profile(pool.get_ref(), &username, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("channel not found".to_string()))?;

    Ok(ApiResponse::ok("Channel fetched successfully", profile))
}

/// GET /api/v1/users/history
pub async fn history(
    pool: web::Data<PgPool>,
    user_id: UserId,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let (rows, total) = watch_history_repo::list_history(
        pool.get_ref(),
        user_id.0,
        params.limit(),
        params.offset(),
    )
    .await?;

    let entries: Vec<WatchHistoryEntry> = rows.into_iter().map(Into::into).collect();

    Ok(ApiResponse::ok(
        "Watch history fetched successfully",
        Page::new(entries, params.page(), params.limit(), total),
    ))
}
