use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response::{ApiResponse, Page, PageParams};

/// POST /api/v1/subscriptions/channel/{id}/toggle
pub async fn toggle_subscription(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    if channel_id == user_id.0 {
        return Err(AppError::BadRequest(
            "cannot subscribe to your own channel".to_string(),
        ));
    }

    user_repo::find_by_id(pool.get_ref(), channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("channel not found".to_string()))?;

    let subscribed =
        if subscription_repo::insert_subscription(pool.get_ref(), user_id.0, channel_id).await? {
            true
        } else {
            subscription_repo::delete_subscription(pool.get_ref(), user_id.0, channel_id).await?;
            false
        };

    let subscriber_count = subscription_repo::count_subscribers(pool.get_ref(), channel_id).await?;

    Ok(ApiResponse::ok(
        if subscribed { "Subscribed" } else { "Unsubscribed" },
        json!({ "subscribed": subscribed, "subscriber_count": subscriber_count }),
    ))
}

/// GET /api/v1/subscriptions/channel/{id}/subscribers
pub async fn list_subscribers(
    pool: web::Data<PgPool>,
    _user_id: UserId,
    path: web::Path<Uuid>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    user_repo::find_by_id(pool.get_ref(), channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("channel not found".to_string()))?;

    let (items, total) = subscription_repo::list_subscribers(
        pool.get_ref(),
        channel_id,
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Subscribers fetched successfully",
        Page::new(items, params.page(), params.limit(), total),
    ))
}

/// GET /api/v1/subscriptions/subscribed
pub async fn list_subscribed_channels(
    pool: web::Data<PgPool>,
    user_id: UserId,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let (items, total) = subscription_repo::list_subscribed_channels(
        pool.get_ref(),
        user_id.0,
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Subscribed channels fetched successfully",
        Page::new(items, params.page(), params.limit(), total),
    ))
}
