use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidtube::handlers::health;
use vidtube::middleware::JwtAuth;
use vidtube::security::jwt::JwtKeys;
use vidtube::services::MediaStorage;
use vidtube::{metrics, routes, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("configuration loading failed: {e}");
            eprintln!("ERROR: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting vidtube v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("database pool creation failed: {e}");
            eprintln!("ERROR: failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("database migration failed: {e}");
        eprintln!("ERROR: failed to run migrations: {e}");
        std::process::exit(1);
    }
    tracing::info!("Database migrations applied");

    let storage = MediaStorage::connect(&config.media).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("media storage initialization failed: {e}"),
        )
    })?;

    let keys = JwtKeys::from_config(&config.jwt);
    let shared_keys = Arc::new(keys.clone());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {bind_address}");

    let pool_data = web::Data::new(pool);
    let keys_data = web::Data::new(keys);
    let storage_data = web::Data::new(storage);
    let cors_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        let cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let auth = JwtAuth::new(shared_keys.clone());

        // The public routes are registered before the wrapped /api/v1 scope
        // so they never hit the bearer middleware.
        App::new()
            .app_data(pool_data.clone())
            .app_data(keys_data.clone())
            .app_data(storage_data.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .route("/api/v1/health", web::get().to(health::health))
            .route("/api/v1/health/live", web::get().to(health::live))
            .service(routes::auth_scope(auth.clone()))
            .service(routes::api_scope(auth))
    })
    .bind(&bind_address)?
    .run()
    .await
}
