//! InMemoryObjectStore - 開発用のオブジェクトストア
//!
//! # 学習ポイント
//! - Mutex で守った BTreeMap をバケットごとに持つ
//! - ロックは await を跨がない（listing は snapshot を取ってからストリームにする）
//! - 障害注入（listing 失敗、特定 key の削除失敗）でエラー分離をテストできる

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{ErrorKind, ObjectKey, StoreError, StoredObject};
use crate::ports::ObjectStore;

/// listing に注入する障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingFault {
    /// 最初の要素を返す前に失敗
    Immediately(ErrorKind),
    /// n 件返した後に失敗（途中ページの失敗を模擬）
    After(usize, ErrorKind),
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, BTreeMap<ObjectKey, StoredObject>>,
    listing_fault: Option<ListingFault>,
    /// key → 残りの失敗回数
    delete_faults: HashMap<ObjectKey, (ErrorKind, usize)>,
    delete_calls: Vec<ObjectKey>,
    list_calls: usize,
}

/// InMemoryObjectStore は開発・テスト用のストア
///
/// # 実装詳細
/// - HashMap<String, BTreeMap<ObjectKey, StoredObject>> でバケットを管理
/// - listing は key の辞書順
/// - 削除呼び出しは成否にかかわらず記録する（`delete_calls()`）
///
/// # 使用例
/// ```ignore
/// let store = InMemoryObjectStore::new();
/// store.put("videos", StoredObject::new("a.mp4", written_at));
/// store.fail_deletes_for("a.mp4", 1);
/// ```
#[derive(Default)]
pub struct InMemoryObjectStore {
    state: Mutex<State>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// オブジェクトを書き込む（同じ key は上書き）
    pub fn put(&self, bucket: &str, object: StoredObject) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(object.key.clone(), object);
    }

    /// sweeper 以外の actor による削除を模擬する
    pub fn remove(&self, bucket: &str, key: &ObjectKey) -> Option<StoredObject> {
        self.lock().buckets.get_mut(bucket)?.remove(key)
    }

    pub fn contains(&self, bucket: &str, key: &ObjectKey) -> bool {
        self.lock()
            .buckets
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key))
    }

    pub fn objects(&self, bucket: &str) -> Vec<StoredObject> {
        self.lock()
            .buckets
            .get(bucket)
            .map(|objects| objects.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 次以降の listing を即座に失敗させる
    pub fn fail_listing(&self, kind: ErrorKind) {
        self.lock().listing_fault = Some(ListingFault::Immediately(kind));
    }

    /// 次以降の listing を `n` 件返した後に失敗させる
    pub fn fail_listing_after(&self, n: usize, kind: ErrorKind) {
        self.lock().listing_fault = Some(ListingFault::After(n, kind));
    }

    pub fn heal_listing(&self) {
        self.lock().listing_fault = None;
    }

    /// `key` の削除を次の `times` 回だけ Connectivity エラーにする
    pub fn fail_deletes_for(&self, key: impl Into<ObjectKey>, times: usize) {
        self.fail_deletes_with(key, ErrorKind::Connectivity, times);
    }

    pub fn fail_deletes_with(&self, key: impl Into<ObjectKey>, kind: ErrorKind, times: usize) {
        self.lock().delete_faults.insert(key.into(), (kind, times));
    }

    /// これまでに受けた削除呼び出し（呼び出し順）
    pub fn delete_calls(&self) -> Vec<ObjectKey> {
        self.lock().delete_calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn clear_calls(&self) {
        let mut state = self.lock();
        state.delete_calls.clear();
        state.list_calls = 0;
    }
}

fn injected(kind: ErrorKind, detail: &str) -> StoreError {
    let message = format!("injected fault: {detail}");
    match kind {
        ErrorKind::Connectivity => StoreError::Connectivity(message),
        ErrorKind::Permission => StoreError::Permission(message),
        ErrorKind::NotFound => StoreError::NotFound(message),
        ErrorKind::Other => StoreError::Other(message),
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxStream<'a, Result<StoredObject, StoreError>> {
        let mut state = self.lock();
        state.list_calls += 1;

        let snapshot: Vec<StoredObject> = state
            .buckets
            .get(bucket)
            .map(|objects| objects.values().cloned().collect())
            .unwrap_or_default();

        let items: Vec<Result<StoredObject, StoreError>> = match state.listing_fault {
            None => snapshot.into_iter().map(Ok).collect(),
            Some(ListingFault::Immediately(kind)) => vec![Err(injected(kind, bucket))],
            Some(ListingFault::After(n, kind)) => snapshot
                .into_iter()
                .take(n)
                .map(Ok)
                .chain(std::iter::once(Err(injected(kind, bucket))))
                .collect(),
        };

        stream::iter(items).boxed()
    }

    async fn delete_object(&self, bucket: &str, key: &ObjectKey) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.delete_calls.push(key.clone());

        if let Some((kind, remaining)) = state.delete_faults.get_mut(key)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(injected(*kind, key.as_str()));
        }

        match state.buckets.get_mut(bucket).and_then(|objects| objects.remove(key)) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("{bucket}/{key}"))),
        }
    }
}
