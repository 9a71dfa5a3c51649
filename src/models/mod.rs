//! Data models: sqlx entities (one per table) and the projections the API
//! returns. Enriched list/detail queries select flat rows (`*Row` types)
//! which are folded into nested response shapes before serialization.

pub mod comment;
pub mod user;
pub mod video;

pub use comment::{Comment, CommentRow, CommentView};
pub use user::{ChannelProfile, User, UserPublic, UserResponse};
pub use video::{
    Video, VideoDetail, VideoDetailRow, VideoOwner, VideoSummary, VideoSummaryRow,
    WatchHistoryEntry, WatchHistoryRow,
};
