use sqlx::PgPool;
use uuid::Uuid;

use crate::models::WatchHistoryRow;

/// Record a watch. Set semantics: re-watching refreshes the timestamp
/// instead of inserting a duplicate.
pub async fn upsert_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// The user's watch history, most recent first, video-and-owner enriched.
pub async fn list_history(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<WatchHistoryRow>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, WatchHistoryRow>(
        r#"
        SELECT
            h.watched_at,
            v.id, v.title, v.description, v.video_url, v.thumbnail_url,
            v.duration_seconds, v.views, v.is_published, v.created_at,
            u.id AS owner_id, u.username AS owner_username,
            u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM watch_history h
        JOIN videos v ON v.id = h.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE h.user_id = $1
        ORDER BY h.watched_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watch_history WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}
