use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::VideoSummary;
use crate::response::{ApiResponse, Page, PageParams};

/// POST /api/v1/likes/video/{id}/toggle
///
/// Insert-or-delete toggle. The insert is `ON CONFLICT DO NOTHING`, so a
/// concurrent double-tap settles on at most one like per (user, video).
pub async fn toggle_video_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    let liked = if like_repo::insert_video_like(pool.get_ref(), user_id.0, video_id).await? {
        true
    } else {
        like_repo::delete_video_like(pool.get_ref(), user_id.0, video_id).await?;
        false
    };

    let likes_count = like_repo::count_video_likes(pool.get_ref(), video_id).await?;

    Ok(ApiResponse::ok(
        if liked { "Video liked" } else { "Video unliked" },
        json!({ "liked": liked, "likes_count": likes_count }),
    ))
}

/// POST /api/v1/likes/comment/{id}/toggle
pub async fn toggle_comment_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    comment_repo::get_comment(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    let liked = if like_repo::insert_comment_like(pool.get_ref(), user_id.0, comment_id).await? {
        true
    } else {
        like_repo::delete_comment_like(pool.get_ref(), user_id.0, comment_id).await?;
        false
    };

    let likes_count = like_repo::count_comment_likes(pool.get_ref(), comment_id).await?;

    Ok(ApiResponse::ok(
        if liked { "Comment liked" } else { "Comment unliked" },
        json!({ "liked": liked, "likes_count": likes_count }),
    ))
}

/// GET /api/v1/likes/videos
pub async fn liked_videos(
    pool: web::Data<PgPool>,
    user_id: UserId,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let (rows, total) =
        like_repo::liked_videos(pool.get_ref(), user_id.0, params.limit(), params.offset()).await?;

    let items: Vec<VideoSummary> = rows.into_iter().map(Into::into).collect();

    Ok(ApiResponse::ok(
        "Liked videos fetched successfully",
        Page::new(items, params.page(), params.limit(), total),
    ))
}
