use sqlx::PgPool;
use uuid::Uuid;

use crate::models::VideoSummaryRow;

/// Insert a video like if absent. Returns true when a row was created.
/// `ON CONFLICT DO NOTHING` plus the partial unique index makes the
/// operation race-safe.
pub async fn insert_video_like(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) WHERE video_id IS NOT NULL DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a video like if present. Returns true when a row was deleted.
pub async fn delete_video_like(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND video_id = $2")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_video_likes(pool: &PgPool, video_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_comment_like(
    pool: &PgPool,
    user_id: Uuid,
    comment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, comment_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, comment_id) WHERE comment_id IS NOT NULL DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_comment_like(
    pool: &PgPool,
    user_id: Uuid,
    comment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND comment_id = $2")
        .bind(user_id)
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_comment_likes(pool: &PgPool, comment_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE comment_id = $1")
        .bind(comment_id)
        .fetch_one(pool)
        .await
}

/// Videos the user liked, most recently liked first. The inner join skips
/// likes whose video has since been deleted.
pub async fn liked_videos(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<VideoSummaryRow>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, VideoSummaryRow>(
        r#"
        SELECT
            v.id, v.title, v.description, v.video_url, v.thumbnail_url,
            v.duration_seconds, v.views, v.is_published, v.created_at,
            u.id AS owner_id, u.username AS owner_username,
            u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE l.user_id = $1 AND l.video_id IS NOT NULL
        ORDER BY l.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        WHERE l.user_id = $1 AND l.video_id IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}
