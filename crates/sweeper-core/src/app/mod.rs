//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて sweeper を実装します。
//!
//! # 主要コンポーネント
//! - **SweeperBuilder**: 構築とワイヤリング（起動時検証）
//! - **Sweeper**: sleep → sweep のループと 1 サイクル分の処理
//! - **SweepReport / SweeperStats**: サイクルの結果と累積カウンタ

pub mod builder;
pub mod status;
pub mod sweeper;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SweeperBuilder};
pub use self::status::{StatsSnapshot, SweepReport, SweeperStats};
pub use self::sweeper::Sweeper;
