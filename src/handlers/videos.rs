use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{video_repo, watch_history_repo};
use crate::db::video_repo::CatalogQuery;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::UserId;
use crate::models::{VideoDetail, VideoSummary};
use crate::response::{ApiResponse, Page, PageParams};
use crate::services::storage::{self, MediaStorage};
use crate::validators;

const MAX_VIDEO_BYTES: usize = 200 * 1024 * 1024;
const MAX_THUMBNAIL_BYTES: usize = 5 * 1024 * 1024;
const MAX_TEXT_BYTES: usize = 4 * 1024;
const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// GET /api/v1/videos
///
/// Catalog browse: published videos matching the search term, owner
/// enriched, paginated. An empty page is a 404.
pub async fn list_videos(
    pool: web::Data<PgPool>,
    _user_id: UserId,
    params: web::Query<CatalogParams>,
) -> Result<HttpResponse> {
    let search = params.query.as_deref().map(str::trim).unwrap_or("");
    if search.is_empty() {
        return Err(AppError::Validation(
            "query parameter is required".to_string(),
        ));
    }

    let paging = PageParams {
        page: params.page,
        limit: params.limit,
    };

    let catalog = CatalogQuery {
        search,
        sort_column: validators::sort_column(params.sort_by.as_deref()),
        sort_direction: validators::sort_direction(params.sort_type.as_deref()),
        owner_id: params.user_id,
        limit: paging.limit(),
        offset: paging.offset(),
    };

    let (rows, total) = video_repo::list_videos(pool.get_ref(), &catalog).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("no videos matched".to_string()));
    }

    let items: Vec<VideoSummary> = rows.into_iter().map(Into::into).collect();

    Ok(ApiResponse::ok(
        "Videos fetched successfully",
        Page::new(items, paging.page(), paging.limit(), total),
    ))
}

/// POST /api/v1/videos
///
/// Multipart publish. Both objects are uploaded before the row is
/// inserted; an insert failure triggers best-effort deletes so storage
/// never holds assets no row references.
pub async fn publish_video(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user_id: UserId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut title: Option<String> = None;
    let mut description = String::new();
    let mut duration: Option<f64> = None;
    let mut video_file: Option<UploadedFile> = None;
    let mut thumbnail_file: Option<UploadedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_err)? {
        let name = field.name().to_string();
        match name.as_str() {
            "title" => title = Some(read_text_field(&mut field, "title").await?),
            "description" => description = read_text_field(&mut field, "description").await?,
            "duration" => {
                let raw = read_text_field(&mut field, "duration").await?;
                duration = Some(raw.trim().parse::<f64>().map_err(|_| {
                    AppError::Validation("duration must be a number of seconds".to_string())
                })?);
            }
            "video" => {
                video_file =
                    Some(read_file_field(&mut field, MAX_VIDEO_BYTES, "video").await?);
            }
            "thumbnail" => {
                thumbnail_file =
                    Some(read_file_field(&mut field, MAX_THUMBNAIL_BYTES, "thumbnail").await?);
            }
            _ => drain_field(&mut field).await?,
        }
    }

    let title = match title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(AppError::Validation("title is required".to_string())),
    };
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    let duration = match duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        Some(_) => {
            return Err(AppError::Validation(
                "duration must be a positive number of seconds".to_string(),
            ))
        }
        None => return Err(AppError::Validation("duration is required".to_string())),
    };
    let video_file =
        video_file.ok_or_else(|| AppError::Validation("video file is required".to_string()))?;
    let thumbnail_file = thumbnail_file
        .ok_or_else(|| AppError::Validation("thumbnail file is required".to_string()))?;

    let video_id = Uuid::new_v4();
    let video_key = storage::video_object_key(video_id, &video_file.filename);
    let thumbnail_key = storage::thumbnail_object_key(video_id, &thumbnail_file.filename);

    let video_url = upload_object(&storage, &video_key, video_file).await?;
    let thumbnail_url = match upload_object(&storage, &thumbnail_key, thumbnail_file).await {
        Ok(url) => url,
        Err(err) => {
            delete_object_best_effort(&storage, &video_key).await;
            return Err(err);
        }
    };

    let created = video_repo::create_video(
        pool.get_ref(),
        video_id,
        user_id.0,
        &title,
        description.trim(),
        &video_url,
        &video_key,
        &thumbnail_url,
        &thumbnail_key,
        duration,
    )
    .await;

    let video = match created {
        Ok(video) => video,
        Err(err) => {
            delete_object_best_effort(&storage, &video_key).await;
            delete_object_best_effort(&storage, &thumbnail_key).await;
            return Err(err.into());
        }
    };

    metrics::VIDEOS_PUBLISHED_TOTAL.inc();
    tracing::info!(video_id = %video.id, owner_id = %user_id.0, "video published");

    Ok(ApiResponse::created("Video published successfully", video))
}

/// GET /api/v1/videos/{id}
///
/// Watch page. Unpublished videos are visible to their owner only. A hit
/// increments the view counter and upserts the caller's watch history.
pub async fn get_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let row = video_repo::get_video_detail(pool.get_ref(), video_id, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    if !row.is_published && row.owner_id != user_id.0 {
        return Err(AppError::NotFound("video not found".to_string()));
    }

    let views = video_repo::increment_views(pool.get_ref(), video_id).await?;
    metrics::VIDEO_VIEWS_TOTAL.inc();
    watch_history_repo::upsert_watch(pool.get_ref(), user_id.0, video_id).await?;

    let mut detail = VideoDetail::from(row);
    detail.views = views;

    Ok(ApiResponse::ok("Video fetched successfully", detail))
}

/// PATCH /api/v1/videos/{id}
///
/// Owner-only metadata edit. A replacement thumbnail is uploaded first;
/// the old object is deleted only after the row points at the new one.
pub async fn update_video(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user_id: UserId,
    path: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user_id.0 {
        return Err(AppError::Authorization(
            "only the owner can edit this video".to_string(),
        ));
    }

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut thumbnail_file: Option<UploadedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_err)? {
        let name = field.name().to_string();
        match name.as_str() {
            "title" => title = Some(read_text_field(&mut field, "title").await?),
            "description" => {
                description = Some(read_text_field(&mut field, "description").await?)
            }
            "thumbnail" => {
                thumbnail_file =
                    Some(read_file_field(&mut field, MAX_THUMBNAIL_BYTES, "thumbnail").await?);
            }
            _ => drain_field(&mut field).await?,
        }
    }

    if let Some(t) = title.as_deref() {
        let trimmed = t.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("title must not be blank".to_string()));
        }
        if trimmed.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        title = Some(trimmed.to_string());
    }
    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::Validation("nothing to update".to_string()));
    }

    let mut new_thumbnail: Option<(String, String)> = None;
    if let Some(file) = thumbnail_file {
        let key = storage::thumbnail_object_key(video_id, &file.filename);
        let url = upload_object(&storage, &key, file).await?;
        new_thumbnail = Some((url, key));
    }

    let updated = video_repo::update_metadata(
        pool.get_ref(),
        video_id,
        title.as_deref(),
        description.as_deref().map(str::trim),
        new_thumbnail.as_ref().map(|(url, _)| url.as_str()),
        new_thumbnail.as_ref().map(|(_, key)| key.as_str()),
    )
    .await;

    let updated = match updated {
        Ok(video) => video,
        Err(err) => {
            if let Some((_, key)) = &new_thumbnail {
                delete_object_best_effort(&storage, key).await;
            }
            return Err(err.into());
        }
    };

    if new_thumbnail.is_some() {
        delete_object_best_effort(&storage, &video.thumbnail_key).await;
    }

    Ok(ApiResponse::ok("Video updated successfully", updated))
}

/// DELETE /api/v1/videos/{id}
///
/// Owner-only. The cascade runs in one transaction; media objects are
/// deleted after commit and failures are logged, not surfaced.
pub async fn delete_video(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user_id.0 {
        return Err(AppError::Authorization(
            "only the owner can delete this video".to_string(),
        ));
    }

    let keys = video_repo::delete_video_cascade(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    delete_object_best_effort(&storage, &keys.0).await;
    delete_object_best_effort(&storage, &keys.1).await;

    tracing::info!(%video_id, owner_id = %user_id.0, "video deleted");

    Ok(ApiResponse::ok(
        "Video deleted successfully",
        json!({ "id": video_id }),
    ))
}

/// PATCH /api/v1/videos/{id}/publish
pub async fn toggle_publish(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user_id.0 {
        return Err(AppError::Authorization(
            "only the owner can change publish state".to_string(),
        ));
    }

    let video = video_repo::toggle_publish(pool.get_ref(), video_id).await?;

    Ok(ApiResponse::ok("Publish state toggled successfully", video))
}

fn multipart_err(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("malformed multipart payload: {err}"))
}

async fn read_text_field(field: &mut Field, label: &str) -> Result<String> {
    let bytes = read_bytes(field, MAX_TEXT_BYTES, label).await?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::Validation(format!("{label} must be valid UTF-8")))
}

async fn read_file_field(field: &mut Field, cap: usize, label: &str) -> Result<UploadedFile> {
    let filename = field
        .content_disposition()
        .get_filename()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("{label} must be a file upload")))?;
    let content_type = field
        .content_type()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let bytes = read_bytes(field, cap, label).await?;
    if bytes.is_empty() {
        return Err(AppError::Validation(format!("{label} file is empty")));
    }

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

async fn read_bytes(field: &mut Field, cap: usize, label: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_err)? {
        if buffer.len() + chunk.len() > cap {
            return Err(AppError::Validation(format!(
                "{label} exceeds the maximum size of {cap} bytes"
            )));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

async fn drain_field(field: &mut Field) -> Result<()> {
    while field.try_next().await.map_err(multipart_err)?.is_some() {}
    Ok(())
}

async fn upload_object(storage: &MediaStorage, key: &str, file: UploadedFile) -> Result<String> {
    match storage.upload(key, file.bytes, &file.content_type).await {
        Ok(url) => {
            metrics::MEDIA_STORAGE_OPS
                .with_label_values(&["upload", "ok"])
                .inc();
            Ok(url)
        }
        Err(err) => {
            metrics::MEDIA_STORAGE_OPS
                .with_label_values(&["upload", "error"])
                .inc();
            Err(err)
        }
    }
}

async fn delete_object_best_effort(storage: &MediaStorage, key: &str) {
    match storage.delete(key).await {
        Ok(()) => {
            metrics::MEDIA_STORAGE_OPS
                .with_label_values(&["delete", "ok"])
                .inc();
        }
        Err(err) => {
            metrics::MEDIA_STORAGE_OPS
                .with_label_values(&["delete", "error"])
                .inc();
            tracing::warn!(key, error = %err, "media object delete failed");
        }
    }
}
