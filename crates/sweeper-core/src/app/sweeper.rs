//! Sweeper - 保持期間切れオブジェクトの削除ループ
//!
//! # フロー（1 サイクル）
//! 1. Clock から `now` を 1 回だけ取得
//! 2. ObjectStore::list_objects() でバケットを列挙
//! 3. RetentionPolicy で各オブジェクトを判定
//! 4. expired なら ObjectStore::delete_object()（1 件ずつ、listing 順）
//!
//! # エラー分離
//! - listing の失敗: ログを出してサイクルを打ち切る
//! - 削除の失敗: ログを出してそのオブジェクトだけ飛ばす
//! - どちらもループには伝播しない。次のサイクルで自然に再試行される

use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, warn};

use super::status::{SweepReport, SweeperStats};
use crate::domain::{DeleteOutcome, RetentionPolicy, StoredObject};
use crate::observability::sweep_span;
use crate::ports::{Clock, ObjectStore, Sleeper};

/// Sweeper は 1 つのバケットを定期的に掃除する
///
/// 構築は `SweeperBuilder` 経由で行う。構築後は設定を変更できない。
pub struct Sweeper {
    pub(super) store: Arc<dyn ObjectStore>,
    pub(super) bucket: String,
    pub(super) policy: RetentionPolicy,
    pub(super) interval: Duration,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) sleeper: Arc<dyn Sleeper>,
    pub(super) dry_run: bool,
    pub(super) stats: Arc<SweeperStats>,
}

impl Sweeper {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// 累積カウンタへのハンドル（ループ実行中に別タスクから読める）
    pub fn stats(&self) -> Arc<SweeperStats> {
        Arc::clone(&self.stats)
    }

    /// 永久に sleep → sweep を繰り返す。戻らない
    pub async fn run_forever(&self) {
        self.log_started();
        loop {
            self.sleeper.sleep(self.interval).await;
            self.sweep_once().await;
        }
    }

    /// shutdown が届くまで sleep → sweep を繰り返す
    ///
    /// shutdown は sleep 中にだけ観測する。実行中のサイクルは中断しない。
    /// sender が drop された場合も停止する。
    pub async fn run_until(&self, mut shutdown: watch::Receiver<bool>) {
        self.log_started();
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = self.sleeper.sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // 次のループで判定
                    continue;
                }
            }

            self.sweep_once().await;
        }
        info!(bucket = %self.bucket, "retention sweeper stopped");
    }

    /// バックグラウンドタスクとして `run_until` を起動する
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run_until(shutdown).await;
        })
    }

    /// 1 サイクル実行する。エラーは返さず SweepReport に記録する
    pub async fn sweep_once(&self) -> SweepReport {
        let cycle = self.stats.begin_cycle();
        let report = self
            .sweep_cycle(cycle)
            .instrument(sweep_span(&self.bucket, cycle))
            .await;
        self.stats.observe(&report);
        report
    }

    fn log_started(&self) {
        info!(
            bucket = %self.bucket,
            retention = %humantime::format_duration(self.policy.retention_period()),
            interval = %humantime::format_duration(self.interval),
            dry_run = self.dry_run,
            "retention sweeper started"
        );
    }

    async fn sweep_cycle(&self, cycle: u64) -> SweepReport {
        let started = Instant::now();
        // 全オブジェクトをこの時刻で判定する
        let now = self.clock.now();
        let mut report = SweepReport::new(cycle, now, self.dry_run);

        info!(now = %now, "sweep cycle started");

        let mut listing = self.store.list_objects(&self.bucket);
        while let Some(item) = listing.next().await {
            let object = match item {
                Ok(object) => object,
                Err(err) => {
                    error!(
                        error = %err,
                        kind = ?err.kind(),
                        listed = report.listed,
                        "listing failed, ending cycle early"
                    );
                    report.listing_error = Some(err.to_string());
                    break;
                }
            };
            report.listed += 1;

            if !self.policy.is_expired(&object, now) {
                continue;
            }
            report.expired += 1;

            let outcome = self.expire(&object, now).await;
            report.record(outcome, object.size);
        }

        report.elapsed = started.elapsed();
        info!(
            listed = report.listed,
            expired = report.expired,
            deleted = report.deleted,
            already_gone = report.already_gone,
            delete_failures = report.delete_failures,
            bytes_reclaimed = report.bytes_reclaimed,
            complete = report.is_complete(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "sweep cycle finished"
        );
        report
    }

    async fn expire(&self, object: &StoredObject, now: DateTime<Utc>) -> DeleteOutcome {
        let age_secs = object.age_at(now).num_seconds();

        if self.dry_run {
            info!(key = %object.key, age_secs, "dry run: would delete expired object");
            return DeleteOutcome::Skipped;
        }

        match self.store.delete_object(&self.bucket, &object.key).await {
            Ok(()) => {
                info!(key = %object.key, age_secs, size = ?object.size, "deleted expired object");
                DeleteOutcome::Deleted
            }
            Err(err) if err.is_not_found() => {
                debug!(key = %object.key, "expired object already gone");
                DeleteOutcome::AlreadyGone
            }
            Err(err) => {
                warn!(
                    key = %object.key,
                    error = %err,
                    kind = ?err.kind(),
                    "failed to delete expired object, retrying next cycle"
                );
                DeleteOutcome::Failed
            }
        }
    }
}
