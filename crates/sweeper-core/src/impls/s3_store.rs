//! S3ObjectStore - MinIO / S3 互換ストア
//!
//! aws-sdk-s3 をパス形式（`http://minio:9000/videos/key`）で使います。
//! MinIO は virtual-host 形式を前提にしないため `force_path_style(true)` が必要です。

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::Object;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};

use crate::config::StoreConfig;
use crate::domain::{ObjectKey, StoreError, StoredObject};
use crate::ports::ObjectStore;

const CREDENTIALS_PROVIDER: &str = "retention-sweeper";

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 設定からクライアントを組み立てる
    ///
    /// ネットワークには触れない。接続できるかどうかは最初の listing で分かる。
    pub async fn connect(config: &StoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(config.endpoint_url())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

/// listing の 1 要素を StoredObject に変換する
///
/// key か last_modified が無いエントリは判定できないので捨てる。
fn to_stored(object: &Object) -> Option<StoredObject> {
    let key = object.key()?;
    let modified = object.last_modified()?;
    let last_modified = DateTime::<Utc>::from_timestamp(modified.secs(), modified.subsec_nanos())?;

    let mut stored = StoredObject::new(key, last_modified);
    if let Some(size) = object.size().and_then(|s| u64::try_from(s).ok()) {
        stored = stored.with_size(size);
    }
    Some(stored)
}

/// 1 ページ分の listing を変換する。変換できないエントリは飛ばす
fn stored_from_page(contents: &[Object]) -> Vec<StoredObject> {
    contents
        .iter()
        .filter_map(|object| {
            let stored = to_stored(object);
            if stored.is_none() {
                tracing::debug!(key = ?object.key(), "skipping listing entry without key or timestamp");
            }
            stored
        })
        .collect()
}

/// S3 のエラーコードと HTTP ステータスから StoreError を決める
fn classify_response(code: Option<&str>, status: Option<u16>, detail: String) -> StoreError {
    match (code, status) {
        (Some("NoSuchBucket"), _) => StoreError::Other(detail),
        (Some("NoSuchKey"), _) | (_, Some(404)) => StoreError::NotFound(detail),
        (Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"), _)
        | (_, Some(401 | 403)) => StoreError::Permission(detail),
        (_, Some(500..=599)) => StoreError::Connectivity(detail),
        _ => StoreError::Other(detail),
    }
}

fn classify<E>(err: SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StoreError::Connectivity(detail)
        }
        _ => {
            let status = err.raw_response().map(|r| r.status().as_u16());
            classify_response(err.code(), status, detail)
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxStream<'a, Result<StoredObject, StoreError>> {
        let pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        // ページ単位で取得し、ページの失敗は 1 件の Err として流す
        stream::unfold(pages, |mut pages| async move {
            let page = pages.next().await?;
            Some((page, pages))
        })
        .flat_map(|page| {
            let items: Vec<Result<StoredObject, StoreError>> = match page {
                Ok(out) => stored_from_page(out.contents()).into_iter().map(Ok).collect(),
                Err(err) => vec![Err(classify(err))],
            };
            stream::iter(items)
        })
        .boxed()
    }

    async fn delete_object(&self, bucket: &str, key: &ObjectKey) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }
}
