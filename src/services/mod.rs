pub mod auth;
pub mod storage;

pub use auth::AuthService;
pub use storage::MediaStorage;
