//! State - オブジェクト単位の状態
//!
//! # 状態遷移
//! - fresh: age ≤ retention
//! - expired: age > retention（削除対象）
//! - deleted: 終端。次の listing には現れない
//!
//! expired → deleted は成功するまで毎サイクル試行される。
//! 失敗しても次のサイクルで再び expired と判定されるので、明示的な retry は持たない。

use serde::{Deserialize, Serialize};

/// ObjectState は 1 サイクル内でのオブジェクトの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectState {
    Fresh,
    Expired,
    Deleted,
}

/// DeleteOutcome は削除 1 回の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// 削除できた
    Deleted,
    /// すでに存在しなかった（他の actor が消した）。成功扱い
    AlreadyGone,
    /// 削除できなかった。次のサイクルで再評価される
    Failed,
    /// dry-run のため削除を発行していない
    Skipped,
}

impl DeleteOutcome {
    /// 削除試行後のオブジェクトの状態
    pub fn resulting_state(self) -> ObjectState {
        match self {
            DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => ObjectState::Deleted,
            DeleteOutcome::Failed | DeleteOutcome::Skipped => ObjectState::Expired,
        }
    }
}
