//! sweeper-core
//!
//! アップロードされたメディアを保持期間だけ残し、期限切れを削除する sweeper。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（object, policy, state, errors）
//! - **ports**: 抽象化レイヤー（ObjectStore, Clock, Sleeper）
//! - **app**: アプリケーションロジック（builder, sweeper, status）
//! - **impls**: 実装（InMemoryObjectStore, S3ObjectStore）
//! - **config**: 環境変数からの設定読み込み
//! - **observability**: tracing の初期化

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{BuildError, SweepReport, Sweeper, SweeperBuilder};
pub use config::{ConfigError, StoreConfig, SweeperConfig};
