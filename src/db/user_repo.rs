use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ChannelProfile, User};

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, avatar_key, \
     cover_image_url, cover_image_key, created_at, updated_at";

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, full_name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn email_or_username_taken(
    pool: &PgPool,
    email: &str,
    username: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($2)
        )
        "#,
    )
    .bind(email)
    .bind(username)
    .fetch_one(pool)
    .await
}

/// Channel page aggregation: profile fields, subscriber count, how many
/// channels this user subscribes to, and whether the viewer subscribes.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Uuid,
) -> Result<Option<ChannelProfile>, sqlx::Error> {
    sqlx::query_as::<_, ChannelProfile>(
        r#"
        SELECT
            u.id,
            u.username,
            u.full_name,
            u.avatar_url,
            u.cover_image_url,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscriber_count,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) AS subscribed_to_count,
            EXISTS(
                SELECT 1 FROM subscriptions s
                WHERE s.channel_id = u.id AND s.subscriber_id = $2
            ) AS is_subscribed,
            u.created_at
        FROM users u
        WHERE LOWER(u.username) = LOWER($1)
        "#,
    )
    .bind(username)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await
}
