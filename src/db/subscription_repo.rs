use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserPublic;

pub async fn insert_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
            .bind(subscriber_id)
            .bind(channel_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_subscribers(pool: &PgPool, channel_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
        .bind(channel_id)
        .fetch_one(pool)
        .await
}

/// Users subscribed to a channel, newest subscription first.
pub async fn list_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<UserPublic>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, UserPublic>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(channel_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = count_subscribers(pool, channel_id).await?;

    Ok((rows, total))
}

/// Channels the user subscribes to, newest subscription first.
pub async fn list_subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<UserPublic>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, UserPublic>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(subscriber_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
        .bind(subscriber_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}
