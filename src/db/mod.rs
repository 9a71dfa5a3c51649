//! Repository functions, one module per aggregate. Plain sqlx, no ORM;
//! enriched queries return flat `*Row` projections from `models`.

pub mod comment_repo;
pub mod like_repo;
pub mod refresh_token_repo;
pub mod subscription_repo;
pub mod user_repo;
pub mod video_repo;
pub mod watch_history_repo;
