//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（オブジェクトストア、時計、タイマー）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - オブジェクトストアが source of truth（sweeper は状態を持たない）
//! - 時刻と待機は差し替え可能（テストで実時間を待たない）

pub mod clock;
pub mod object_store;
pub mod sleeper;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::object_store::ObjectStore;
pub use self::sleeper::{Sleeper, TokioSleeper};
