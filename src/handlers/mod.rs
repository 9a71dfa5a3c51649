//! HTTP request handlers. Handlers stay thin: validate the request shape,
//! call into `db`/`services`, wrap the result in the response envelope.

pub mod auth;
pub mod comments;
pub mod health;
pub mod likes;
pub mod subscriptions;
pub mod users;
pub mod videos;
