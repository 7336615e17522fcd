//! Object - バケット内のオブジェクト
//!
//! ObjectStore の listing が返す 1 件分の情報です。
//! sweeper は key と last_modified しか判断に使いません。

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ObjectKey はバケット内で一意なオブジェクトの識別子
///
/// 中身は opaque な文字列です（`videos/2024/a.mp4` のような階層風の key も
/// sweeper からはただの文字列として扱う）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// StoredObject は listing の 1 エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: ObjectKey,

    /// ストアが書き込み時に設定する時刻
    pub last_modified: DateTime<Utc>,

    /// ストアが返した場合のみ。ログと統計にだけ使う
    pub size: Option<u64>,
}

impl StoredObject {
    pub fn new(key: impl Into<ObjectKey>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// `now` 時点での経過時間
    ///
    /// last_modified が `now` より未来（時計のずれ）の場合は負の値になる。
    pub fn age_at(&self, now: DateTime<Utc>) -> ChronoDuration {
        now - self.last_modified
    }
}
