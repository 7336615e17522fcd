//! RetentionPolicy - 保持期間の判定
//!
//! # 学習ポイント
//! - 判定は純粋関数（object + now → ObjectState）
//! - `now` は呼び出し側が 1 サイクルに 1 回だけ取得して渡す
//! - 不正な期間はコンストラクタで弾く（Fail-fast 設計）

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use super::errors::PolicyError;
use super::object::StoredObject;
use super::state::ObjectState;

/// RetentionPolicy はオブジェクトを保持する最大の経過時間
///
/// プロセス起動時に 1 回だけ作られ、以後変更されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    retention_period: Duration,
    threshold: ChronoDuration,
}

impl RetentionPolicy {
    /// # Errors
    /// - 0 秒: 毎サイクル全削除になるので設定ミスとして扱う
    /// - chrono で表現できないほど長い期間
    pub fn new(retention_period: Duration) -> Result<Self, PolicyError> {
        if retention_period.is_zero() {
            return Err(PolicyError::ZeroRetention);
        }
        let threshold = ChronoDuration::from_std(retention_period)
            .map_err(|_| PolicyError::OutOfRange(retention_period))?;
        Ok(Self {
            retention_period,
            threshold,
        })
    }

    pub fn retention_period(&self) -> Duration {
        self.retention_period
    }

    /// `now` 時点で object を評価する
    ///
    /// `age > retention_period` のときだけ Expired。ちょうど同じなら Fresh。
    pub fn evaluate(&self, object: &StoredObject, now: DateTime<Utc>) -> ObjectState {
        if object.age_at(now) > self.threshold {
            ObjectState::Expired
        } else {
            ObjectState::Fresh
        }
    }

    pub fn is_expired(&self, object: &StoredObject, now: DateTime<Utc>) -> bool {
        self.evaluate(object, now) == ObjectState::Expired
    }
}
