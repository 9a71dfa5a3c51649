use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserPublic;

/// Full video row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    #[serde(skip_serializing)]
    pub video_key: String,
    pub thumbnail_url: String,
    #[serde(skip_serializing)]
    pub thumbnail_key: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat catalog row: video columns joined with the owner projection.
#[derive(Debug, Clone, FromRow)]
pub struct VideoSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: Option<String>,
}

/// Catalog entry as the API returns it.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: UserPublic,
}

impl From<VideoSummaryRow> for VideoSummary {
    fn from(row: VideoSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            duration_seconds: row.duration_seconds,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            owner: UserPublic {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar_url: row.owner_avatar_url,
            },
        }
    }
}

/// Flat detail row produced by the watch-page aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct VideoDetailRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: Option<String>,
    pub subscriber_count: i64,
    pub is_subscribed: bool,
    pub likes_count: i64,
    pub is_liked: bool,
    pub comments_count: i64,
}

/// Channel card embedded in the watch page.
#[derive(Debug, Clone, Serialize)]
pub struct VideoOwner {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: i64,
    pub is_subscribed: bool,
}

/// Watch-page payload: video, channel card, and viewer-specific flags.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: VideoOwner,
    pub likes_count: i64,
    pub is_liked: bool,
    pub comments_count: i64,
}

impl From<VideoDetailRow> for VideoDetail {
    fn from(row: VideoDetailRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            duration_seconds: row.duration_seconds,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            owner: VideoOwner {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar_url: row.owner_avatar_url,
                subscriber_count: row.subscriber_count,
                is_subscribed: row.is_subscribed,
            },
            likes_count: row.likes_count,
            is_liked: row.is_liked,
            comments_count: row.comments_count,
        }
    }
}

/// Flat watch-history row: history timestamp plus the catalog projection.
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryRow {
    pub watched_at: DateTime<Utc>,
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchHistoryEntry {
    pub watched_at: DateTime<Utc>,
    pub video: VideoSummary,
}

impl From<WatchHistoryRow> for WatchHistoryEntry {
    fn from(row: WatchHistoryRow) -> Self {
        Self {
            watched_at: row.watched_at,
            video: VideoSummary {
                id: row.id,
                title: row.title,
                description: row.description,
                video_url: row.video_url,
                thumbnail_url: row.thumbnail_url,
                duration_seconds: row.duration_seconds,
                views: row.views,
                is_published: row.is_published,
                created_at: row.created_at,
                owner: UserPublic {
                    id: row.owner_id,
                    username: row.owner_username,
                    full_name: row.owner_full_name,
                    avatar_url: row.owner_avatar_url,
                },
            },
        }
    }
}
