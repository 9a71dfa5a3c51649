//! Prometheus metrics.
//!
//! Collectors for the video lifecycle plus an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter,
    IntCounterVec, TextEncoder};

lazy_static! {
    /// Videos published through the multipart upload endpoint.
    pub static ref VIDEOS_PUBLISHED_TOTAL: IntCounter = register_int_counter!(
        "vidtube_videos_published_total",
        "Videos published through the upload endpoint"
    )
    .expect("failed to register vidtube_videos_published_total");

    /// Video watch-page hits (each one increments the view counter).
    pub static ref VIDEO_VIEWS_TOTAL: IntCounter = register_int_counter!(
        "vidtube_video_views_total",
        "Watch-page hits that incremented a view counter"
    )
    .expect("failed to register vidtube_video_views_total");

    /// Media storage operations segmented by operation and outcome.
    pub static ref MEDIA_STORAGE_OPS: IntCounterVec = register_int_counter_vec!(
        "vidtube_media_storage_ops_total",
        "Media storage operations segmented by op and outcome",
        &["op", "outcome"]
    )
    .expect("failed to register vidtube_media_storage_ops_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
