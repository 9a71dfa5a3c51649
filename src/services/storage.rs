//! S3-compatible media storage.
//!
//! Uploads happen before the database row that references the object is
//! written; deletes happen after the commit and are best-effort (the
//! database is the source of truth for what exists).
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct MediaStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl MediaStorage {
    /// Build the S3 client from configuration. An endpoint override points
    /// the client at MinIO-style local stacks.
    pub async fn connect(config: &MediaConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "vidtube",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload an object and return its public URL.
    pub async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        Ok(self.public_url(key))
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete of {key} failed: {e}")))?;

        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Object key for a video's source file: `videos/{id}/source.{ext}`.
pub fn video_object_key(video_id: Uuid, filename: &str) -> String {
    format!("videos/{video_id}/source.{}", extension_of(filename))
}

/// Object key for a video's thumbnail. A fresh UUID in the key means a
/// replacement thumbnail never collides with the object it replaces.
pub fn thumbnail_object_key(video_id: Uuid, filename: &str) -> String {
    format!(
        "videos/{video_id}/thumb-{}.{}",
        Uuid::new_v4(),
        extension_of(filename)
    )
}

fn extension_of(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_key_uses_file_extension() {
        let id = Uuid::nil();
        assert_eq!(
            video_object_key(id, "clip.mp4"),
            format!("videos/{id}/source.mp4")
        );
    }

    #[test]
    fn missing_extension_falls_back_to_bin() {
        let id = Uuid::nil();
        assert_eq!(video_object_key(id, "clip"), format!("videos/{id}/source.bin"));
        assert_eq!(
            video_object_key(id, "clip."),
            format!("videos/{id}/source.bin")
        );
    }

    #[test]
    fn oversized_extension_is_rejected() {
        let id = Uuid::nil();
        assert_eq!(
            video_object_key(id, "clip.averylongext"),
            format!("videos/{id}/source.bin")
        );
    }

    #[test]
    fn thumbnail_keys_never_collide() {
        let id = Uuid::new_v4();
        let a = thumbnail_object_key(id, "t.png");
        let b = thumbnail_object_key(id, "t.png");
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("videos/{id}/thumb-")));
        assert!(a.ends_with(".png"));
    }
}
