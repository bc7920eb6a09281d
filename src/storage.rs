// ABOUTME: Object storage client for profile pictures
// ABOUTME: Uploads avatars to an S3-compatible bucket and returns their public URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Profile picture storage.
//!
//! Avatars are best-effort: an upload failure is reported to the caller and
//! logged, but it never blocks onboarding or corrupts the profile. When no
//! bucket is configured the feature is simply absent.

use crate::config::environment::AvatarStorageConfig;
use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

/// S3-backed avatar storage
#[derive(Clone)]
pub struct AvatarStorage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl AvatarStorage {
    /// Build a client from ambient AWS credentials and the configured bucket
    pub async fn from_config(config: &AvatarStorageConfig) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: S3Client::new(&aws_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Upload a user's avatar, overwriting any previous one, and return the
    /// public URL it is served under.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails; the caller decides whether the
    /// surrounding operation proceeds without a picture.
    pub async fn put_avatar(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let key = format!("profile-pictures/{user_id}");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded avatar to s3://{}/{key}", self.bucket);

        Ok(format!("{}/{key}", self.public_base_url))
    }
}
