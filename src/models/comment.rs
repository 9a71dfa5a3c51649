use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserPublic;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat list row: comment joined with its author plus like enrichment.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: Option<String>,
    pub likes_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: UserPublic,
    pub likes_count: i64,
    pub is_liked: bool,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            video_id: row.video_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner: UserPublic {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar_url: row.owner_avatar_url,
            },
            likes_count: row.likes_count,
            is_liked: row.is_liked,
        }
    }
}
