use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Video, VideoDetailRow, VideoSummaryRow};

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, video_key, \
     thumbnail_url, thumbnail_key, duration_seconds, views, is_published, created_at, updated_at";

/// Owner-enriched projection shared by the catalog and history queries.
const SUMMARY_SELECT: &str = r#"
    v.id, v.title, v.description, v.video_url, v.thumbnail_url,
    v.duration_seconds, v.views, v.is_published, v.created_at,
    u.id AS owner_id, u.username AS owner_username,
    u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
"#;

pub struct CatalogQuery<'a> {
    pub search: &'a str,
    /// Whitelisted column name, see `validators::sort_column`
    pub sort_column: &'static str,
    /// "ASC" or "DESC", see `validators::sort_direction`
    pub sort_direction: &'static str,
    pub owner_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

#[allow(clippy::too_many_arguments)]
pub async fn create_video(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    video_key: &str,
    thumbnail_url: &str,
    thumbnail_key: &str,
    duration_seconds: f64,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (
            id, owner_id, title, description, video_url, video_key,
            thumbnail_url, thumbnail_key, duration_seconds
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(video_key)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .bind(duration_seconds)
    .fetch_one(pool)
    .await
}

pub async fn get_video(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Catalog browse: case-insensitive substring search over title and
/// description, published only, owner-enriched, paginated. The sort column
/// and direction come from a whitelist, never from raw user input.
pub async fn list_videos(
    pool: &PgPool,
    query: &CatalogQuery<'_>,
) -> Result<(Vec<VideoSummaryRow>, i64), sqlx::Error> {
    let pattern = format!("%{}%", query.search);

    let sql = format!(
        r#"
        SELECT {SUMMARY_SELECT}
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.is_published
          AND (v.title ILIKE $1 OR v.description ILIKE $1)
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        ORDER BY v.{} {}
        LIMIT $3 OFFSET $4
        "#,
        query.sort_column, query.sort_direction
    );

    let rows = sqlx::query_as::<_, VideoSummaryRow>(&sql)
        .bind(&pattern)
        .bind(query.owner_id)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM videos v
        WHERE v.is_published
          AND (v.title ILIKE $1 OR v.description ILIKE $1)
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        "#,
    )
    .bind(&pattern)
    .bind(query.owner_id)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

/// Watch-page aggregation. One round-trip computes the owner's channel
/// card (subscriber count + viewer flag), the like enrichment, and the
/// comment count.
pub async fn get_video_detail(
    pool: &PgPool,
    video_id: Uuid,
    viewer_id: Uuid,
) -> Result<Option<VideoDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoDetailRow>(
        r#"
        SELECT
            v.id, v.title, v.description, v.video_url, v.thumbnail_url,
            v.duration_seconds, v.views, v.is_published, v.created_at,
            u.id AS owner_id, u.username AS owner_username,
            u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscriber_count,
            EXISTS(
                SELECT 1 FROM subscriptions s
                WHERE s.channel_id = u.id AND s.subscriber_id = $2
            ) AS is_subscribed,
            (SELECT COUNT(*) FROM likes l WHERE l.video_id = v.id) AS likes_count,
            EXISTS(
                SELECT 1 FROM likes l WHERE l.video_id = v.id AND l.user_id = $2
            ) AS is_liked,
            (SELECT COUNT(*) FROM comments c WHERE c.video_id = v.id) AS comments_count
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await
}

pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views")
        .bind(video_id)
        .fetch_one(pool)
        .await
}

pub async fn update_metadata(
    pool: &PgPool,
    video_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    thumbnail_url: Option<&str>,
    thumbnail_key: Option<&str>,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail_url = COALESCE($4, thumbnail_url),
            thumbnail_key = COALESCE($5, thumbnail_key),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .fetch_one(pool)
    .await
}

pub async fn toggle_publish(pool: &PgPool, video_id: Uuid) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .fetch_one(pool)
    .await
}

/// Delete a video and everything that references it, in one transaction:
/// likes on its comments, the comments, likes on the video, watch-history
/// rows, then the video itself. Returns the storage keys of the media
/// objects so the caller can delete them after commit.
pub async fn delete_video_cascade(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Option<(String, String)>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let keys: Option<(String, String)> = sqlx::query_as(
        "SELECT video_key, thumbnail_key FROM videos WHERE id = $1 FOR UPDATE",
    )
    .bind(video_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(keys) = keys else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query(
        "DELETE FROM likes WHERE comment_id IN (SELECT id FROM comments WHERE video_id = $1)",
    )
    .bind(video_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM comments WHERE video_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM likes WHERE video_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM watch_history WHERE video_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(keys))
}
