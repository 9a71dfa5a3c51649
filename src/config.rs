//! Configuration management.
//!
//! Everything is loaded from environment variables; `.env` is read by
//! `main` before this runs. Production refuses the defaults that only make
//! sense on a developer laptop.
use anyhow::bail;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

/// S3-compatible media storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Optional endpoint override for MinIO-style local stacks
    pub endpoint: Option<String>,
    /// Base URL prepended to object keys when building public URLs
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                bail!("JWT_SECRET must be set in production")
            }
            Err(_) => "vidtube-dev-secret".to_string(),
        };
        if app_env.eq_ignore_ascii_case("production") && jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 bytes in production");
        }

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                bail!("CORS_ALLOWED_ORIGINS must be set in production")
            }
            Err(_) => "http://localhost:3000".to_string(),
        };
        if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
            bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("VIDTUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("VIDTUBE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/vidtube".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_ttl_secs: std::env::var("JWT_ACCESS_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(900),
                refresh_ttl_secs: std::env::var("JWT_REFRESH_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60 * 60 * 24 * 30),
            },
            media: MediaConfig {
                bucket: std::env::var("MEDIA_BUCKET").unwrap_or_else(|_| "vidtube-media".to_string()),
                region: std::env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("MEDIA_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: std::env::var("MEDIA_SECRET_ACCESS_KEY").unwrap_or_default(),
                endpoint: std::env::var("MEDIA_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
                public_base_url: std::env::var("MEDIA_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:9000/vidtube-media".to_string()),
            },
        })
    }
}
