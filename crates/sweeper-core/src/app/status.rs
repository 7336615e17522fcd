//! Status - サイクルの結果と累積カウンタ
//!
//! - **SweepReport**: 1 サイクル分の結果（`sweep_once()` の戻り値）
//! - **SweeperStats**: プロセス起動からの累積値。ループ実行中に別タスクから読める
//!
//! どちらも観測用で、削除の判断には使いません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::DeleteOutcome;

/// SweepReport は 1 サイクルの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// 1 始まりの通し番号
    pub cycle: u64,
    /// このサイクルで全オブジェクトの判定に使った時刻
    pub started_at: DateTime<Utc>,
    pub listed: u64,
    pub expired: u64,
    pub deleted: u64,
    /// 削除しようとしたら既に無かった
    pub already_gone: u64,
    pub delete_failures: u64,
    /// size が分かっているオブジェクトのみ
    pub bytes_reclaimed: u64,
    /// listing が失敗してサイクルを打ち切った場合のエラー
    pub listing_error: Option<String>,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn new(cycle: u64, started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            cycle,
            started_at,
            listed: 0,
            expired: 0,
            deleted: 0,
            already_gone: 0,
            delete_failures: 0,
            bytes_reclaimed: 0,
            listing_error: None,
            dry_run,
            elapsed: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: DeleteOutcome, size: Option<u64>) {
        match outcome {
            DeleteOutcome::Deleted => {
                self.deleted += 1;
                self.bytes_reclaimed += size.unwrap_or(0);
            }
            DeleteOutcome::AlreadyGone => self.already_gone += 1,
            DeleteOutcome::Failed => self.delete_failures += 1,
            DeleteOutcome::Skipped => {}
        }
    }

    /// listing が最後まで読めたか
    pub fn is_complete(&self) -> bool {
        self.listing_error.is_none()
    }
}

/// SweeperStats はプロセス全体の累積カウンタ
///
/// `Arc<SweeperStats>` で共有し、ロックなしで読む。
#[derive(Debug, Default)]
pub struct SweeperStats {
    cycles: AtomicU64,
    listing_failures: AtomicU64,
    objects_deleted: AtomicU64,
    delete_failures: AtomicU64,
    last_complete_cycle: Mutex<Option<DateTime<Utc>>>,
}

/// SweeperStats の読み取り用コピー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub cycles: u64,
    pub listing_failures: u64,
    pub objects_deleted: u64,
    pub delete_failures: u64,
    pub last_complete_cycle: Option<DateTime<Utc>>,
}

impl SweeperStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次のサイクル番号（1 始まり）を払い出す
    pub fn begin_cycle(&self) -> u64 {
        self.cycles.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn observe(&self, report: &SweepReport) {
        self.objects_deleted
            .fetch_add(report.deleted, Ordering::Relaxed);
        self.delete_failures
            .fetch_add(report.delete_failures, Ordering::Relaxed);

        if report.is_complete() {
            *self
                .last_complete_cycle
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(report.started_at);
        } else {
            self.listing_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            listing_failures: self.listing_failures.load(Ordering::Relaxed),
            objects_deleted: self.objects_deleted.load(Ordering::Relaxed),
            delete_failures: self.delete_failures.load(Ordering::Relaxed),
            last_complete_cycle: *self
                .last_complete_cycle
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = SweepReport::new(1, t0(), false);
        report.record(DeleteOutcome::Deleted, Some(100));
        report.record(DeleteOutcome::Deleted, None);
        report.record(DeleteOutcome::AlreadyGone, Some(7));
        report.record(DeleteOutcome::Failed, Some(9));

        assert_eq!(report.deleted, 2);
        assert_eq!(report.already_gone, 1);
        assert_eq!(report.delete_failures, 1);
        assert_eq!(report.bytes_reclaimed, 100);
    }

    #[test]
    fn stats_accumulate_across_cycles() {
        let stats = SweeperStats::new();

        let mut first = SweepReport::new(stats.begin_cycle(), t0(), false);
        first.deleted = 3;
        first.delete_failures = 1;
        stats.observe(&first);

        let mut second =
            SweepReport::new(stats.begin_cycle(), t0() + chrono::Duration::minutes(2), false);
        assert_eq!(second.cycle, 2);
        second.listing_error = Some("unreachable".into());
        stats.observe(&second);

        let snap = stats.snapshot();
        assert_eq!(snap.cycles, 2);
        assert_eq!(snap.objects_deleted, 3);
        assert_eq!(snap.delete_failures, 1);
        assert_eq!(snap.listing_failures, 1);
        assert_eq!(snap.last_complete_cycle, Some(t0()));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = SweepReport::new(4, t0(), true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cycle"], 4);
        assert_eq!(json["dry_run"], true);
        assert!(json["listing_error"].is_null());
    }
}
