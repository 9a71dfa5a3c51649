use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::CommentView;
use crate::response::{ApiResponse, Page, PageParams};

const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

fn validated_content(raw: &str) -> Result<&str> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content must not be blank".to_string()));
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(format!(
            "content must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(content)
}

/// GET /api/v1/videos/{id}/comments
///
/// Newest first, author-enriched, with per-comment like counts and the
/// viewer's like flag. An empty page is an empty page, not a 404.
pub async fn list_comments(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    let (rows, total) = comment_repo::list_for_video(
        pool.get_ref(),
        video_id,
        user_id.0,
        params.limit(),
        params.offset(),
    )
    .await?;

    let items: Vec<CommentView> = rows.into_iter().map(Into::into).collect();

    Ok(ApiResponse::ok(
        "Comments fetched successfully",
        Page::new(items, params.page(), params.limit(), total),
    ))
}

/// POST /api/v1/videos/{id}/comments
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let content = validated_content(&body.content)?;

    video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    let comment = comment_repo::create_comment(pool.get_ref(), video_id, user_id.0, content).await?;

    Ok(ApiResponse::created("Comment added successfully", comment))
}

/// PATCH /api/v1/comments/{id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let content = validated_content(&body.content)?;

    let comment = comment_repo::get_comment(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    if comment.owner_id != user_id.0 {
        return Err(AppError::Authorization(
            "only the author can edit this comment".to_string(),
        ));
    }

    let updated = comment_repo::update_content(pool.get_ref(), comment_id, content).await?;

    Ok(ApiResponse::ok("Comment updated successfully", updated))
}

/// DELETE /api/v1/comments/{id}
///
/// The comment's author or the video's owner may delete it.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    let comment = comment_repo::get_comment(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    if comment.owner_id != user_id.0 {
        let video = video_repo::get_video(pool.get_ref(), comment.video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
        if video.owner_id != user_id.0 {
            return Err(AppError::Authorization(
                "only the author or the video owner can delete this comment".to_string(),
            ));
        }
    }

    let deleted = comment_repo::delete_with_likes(pool.get_ref(), comment_id).await?;
    if !deleted {
        return Err(AppError::NotFound("comment not found".to_string()));
    }

    Ok(ApiResponse::ok(
        "Comment deleted successfully",
        json!({ "id": comment_id }),
    ))
}
