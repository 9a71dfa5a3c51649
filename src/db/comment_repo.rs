use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Comment, CommentRow};

pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, video_id, owner_id, content, created_at, updated_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Comments for a video, newest first, author-enriched, with per-comment
/// like counts and the viewer's like flag.
pub async fn list_for_video(
    pool: &PgPool,
    video_id: Uuid,
    viewer_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<CommentRow>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT
            c.id, c.video_id, c.content, c.created_at, c.updated_at,
            u.id AS owner_id, u.username AS owner_username,
            u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url,
            (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id) AS likes_count,
            EXISTS(
                SELECT 1 FROM likes l WHERE l.comment_id = c.id AND l.user_id = $2
            ) AS is_liked
        FROM comments c
        JOIN users u ON u.id = c.owner_id
        WHERE c.video_id = $1
        ORDER BY c.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(video_id)
    .bind(viewer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

pub async fn update_content(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Delete a comment and its likes in one transaction.
pub async fn delete_with_likes(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE comment_id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}
