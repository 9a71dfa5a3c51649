//! vidtube service library
//!
//! A video-sharing platform backend: users upload videos, comment, like
//! content, subscribe to channels, and browse a paginated catalog.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers
//! - `db`: repository functions over PostgreSQL
//! - `models`: sqlx entities and API projections
//! - `services`: media storage and auth token lifecycle
//! - `middleware`: bearer-token authentication
//! - `security`: password hashing and JWT helpers
//! - `error`: error types and HTTP mapping
//! - `config`: configuration management
//! - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
