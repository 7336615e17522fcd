//! Errors - エラー型と分類
//!
//! sweeper が扱うエラーはすべてここで定義します。
//! ストアのエラーはサイクル内で回収され、ループまで伝播しません。

use std::time::Duration;

use thiserror::Error;

/// ErrorKind は StoreError の運用分類
///
/// - Connectivity: ストアに到達できない（次のサイクルで自然に再試行）
/// - Permission: 認証・認可の失敗
/// - NotFound: key が存在しない（削除では成功扱い）
/// - Other: 上記以外
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    Permission,
    NotFound,
    Other,
}

/// StoreError は ObjectStore の操作エラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object store unreachable: {0}")]
    Connectivity(String),

    #[error("access denied: {0}")]
    Permission(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("object store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Connectivity(_) => ErrorKind::Connectivity,
            StoreError::Permission(_) => ErrorKind::Permission,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Other(_) => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// PolicyError は RetentionPolicy の構築エラー
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("retention period must be greater than zero")]
    ZeroRetention,

    #[error("retention period {0:?} is out of range")]
    OutOfRange(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(
            StoreError::Connectivity("refused".into()).kind(),
            ErrorKind::Connectivity
        );
        assert_eq!(StoreError::Permission("403".into()).kind(), ErrorKind::Permission);
        assert!(StoreError::NotFound("a.mp4".into()).is_not_found());
        assert!(!StoreError::Other("boom".into()).is_not_found());
    }

    #[test]
    fn message_contains_detail() {
        let err = StoreError::Connectivity("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
