use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// GET /api/v1/health. Readiness: the database has to answer.
pub async fn health(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "database": "up",
        })),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "database": "down",
            }))
        }
    }
}

/// GET /api/v1/health/live. Liveness: the process is serving requests.
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}
