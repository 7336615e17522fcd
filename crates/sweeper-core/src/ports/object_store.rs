//! ObjectStore port - Blob ストレージ（MinIO/S3/InMemory）
//!
//! sweeper がストアに要求するのは listing と削除の 2 つだけです。
//!
//! # 実装
//! - **InMemoryObjectStore**: 開発・テスト用（impls/inmem_store）
//! - **S3ObjectStore**: MinIO / S3 互換エンドポイント（impls/s3_store）

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

use crate::domain::{ObjectKey, StoreError, StoredObject};

/// ObjectStore はバケットの listing と削除を提供
///
/// # 設計原則
/// - listing は遅延ストリーム。ページングは実装側に隠す
/// - listing は point-in-time snapshot ではない（並行する書き込みは見えたり見えなかったりする）
/// - 途中のページで失敗した場合は `Err` 要素を流す
/// - 存在しない key の削除は `StoreError::NotFound` を返してよい（呼び出し側が成功扱いにする）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// バケット内の全オブジェクトを再帰的に列挙する
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxStream<'a, Result<StoredObject, StoreError>>;

    async fn delete_object(&self, bucket: &str, key: &ObjectKey) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: ObjectStore + ?Sized> ObjectStore for Arc<S> {
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxStream<'a, Result<StoredObject, StoreError>> {
        (**self).list_objects(bucket)
    }

    async fn delete_object(&self, bucket: &str, key: &ObjectKey) -> Result<(), StoreError> {
        (**self).delete_object(bucket, key).await
    }
}
