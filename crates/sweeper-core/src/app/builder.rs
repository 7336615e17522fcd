//! SweeperBuilder - Sweeper の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 設定ミスはループが始まる前に BuildError として返す

use std::sync::Arc;
use std::time::Duration;

use super::status::SweeperStats;
use super::sweeper::Sweeper;
use crate::config::SweeperConfig;
use crate::domain::{PolicyError, RetentionPolicy};
use crate::ports::{Clock, ObjectStore, Sleeper, SystemClock, TokioSleeper};

/// SweeperBuilder は Sweeper を構築
///
/// # 使用例
/// ```ignore
/// let sweeper = SweeperBuilder::new(store)
///     .bucket("videos")
///     .retention(Duration::from_secs(120))
///     .interval(Duration::from_secs(120))
///     .build()?;
/// ```
///
/// # デフォルト
/// - clock: SystemClock
/// - sleeper: TokioSleeper
/// - dry_run: false
pub struct SweeperBuilder {
    store: Arc<dyn ObjectStore>,
    bucket: Option<String>,
    retention: Option<Duration>,
    interval: Option<Duration>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    dry_run: bool,
}

/// BuildError は Sweeper 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{0} was not configured")]
    Missing(&'static str),

    #[error("bucket name must not be empty")]
    EmptyBucket,

    #[error("sweep interval must be greater than zero")]
    ZeroInterval,

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl SweeperBuilder {
    pub fn new(store: impl ObjectStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            bucket: None,
            retention: None,
            interval: None,
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(TokioSleeper),
            dry_run: false,
        }
    }

    /// 設定値をまとめて反映する（clock / sleeper はデフォルトのまま）
    pub fn from_config(config: &SweeperConfig, store: impl ObjectStore + 'static) -> Self {
        Self::new(store)
            .bucket(config.store.bucket.clone())
            .retention(config.retention_period)
            .interval(config.sweep_interval)
            .dry_run(config.dry_run)
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn retention(mut self, retention_period: Duration) -> Self {
        self.retention = Some(retention_period);
        self
    }

    pub fn policy(self, policy: RetentionPolicy) -> Self {
        self.retention(policy.retention_period())
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 検証して Sweeper を生成
    ///
    /// # 検証
    /// - bucket / retention / interval が設定されていること
    /// - bucket が空文字でないこと
    /// - interval が 0 でないこと
    /// - retention が RetentionPolicy として妥当であること
    pub fn build(self) -> Result<Sweeper, BuildError> {
        let bucket = self.bucket.ok_or(BuildError::Missing("bucket"))?;
        if bucket.trim().is_empty() {
            return Err(BuildError::EmptyBucket);
        }

        let retention = self.retention.ok_or(BuildError::Missing("retention period"))?;
        let policy = RetentionPolicy::new(retention)?;

        let interval = self.interval.ok_or(BuildError::Missing("sweep interval"))?;
        if interval.is_zero() {
            return Err(BuildError::ZeroInterval);
        }

        Ok(Sweeper {
            store: self.store,
            bucket,
            policy,
            interval,
            clock: self.clock,
            sleeper: self.sleeper,
            dry_run: self.dry_run,
            stats: Arc::new(SweeperStats::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryObjectStore;

    fn complete() -> SweeperBuilder {
        SweeperBuilder::new(InMemoryObjectStore::new())
            .bucket("videos")
            .retention(Duration::from_secs(120))
            .interval(Duration::from_secs(60))
    }

    #[test]
    fn test_build_success() {
        let sweeper = complete().build().unwrap();
        assert_eq!(sweeper.bucket(), "videos");
        assert_eq!(sweeper.policy().retention_period(), Duration::from_secs(120));
        assert_eq!(sweeper.interval(), Duration::from_secs(60));
        assert!(!sweeper.is_dry_run());
    }

    #[test]
    fn test_build_missing_bucket() {
        let result = SweeperBuilder::new(InMemoryObjectStore::new())
            .retention(Duration::from_secs(120))
            .interval(Duration::from_secs(60))
            .build();
        assert!(matches!(result, Err(BuildError::Missing("bucket"))));
    }

    #[test]
    fn test_build_empty_bucket() {
        let result = complete().bucket("  ").build();
        assert!(matches!(result, Err(BuildError::EmptyBucket)));
    }

    #[test]
    fn test_build_zero_retention() {
        let result = complete().retention(Duration::ZERO).build();
        assert!(matches!(
            result,
            Err(BuildError::Policy(PolicyError::ZeroRetention))
        ));
    }

    #[test]
    fn test_build_zero_interval() {
        let result = complete().interval(Duration::ZERO).build();
        assert!(matches!(result, Err(BuildError::ZeroInterval)));
    }

    #[test]
    fn test_build_with_policy() {
        let policy = RetentionPolicy::new(Duration::from_secs(300)).unwrap();
        let sweeper = complete().policy(policy).build().unwrap();
        assert_eq!(sweeper.policy(), policy);
    }

    #[test]
    fn test_build_from_config() {
        let config = SweeperConfig::from_lookup(|name| match name {
            "MINIO_USER" | "MINIO_PASSWORD" => Some("minioadmin".to_string()),
            "MINIO_BUCKET" => Some("uploads".to_string()),
            "SWEEP_DRY_RUN" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();

        let sweeper = SweeperBuilder::from_config(&config, InMemoryObjectStore::new())
            .build()
            .unwrap();

        assert_eq!(sweeper.bucket(), "uploads");
        assert_eq!(sweeper.interval(), config.sweep_interval);
        assert!(sweeper.is_dry_run());
    }
}
