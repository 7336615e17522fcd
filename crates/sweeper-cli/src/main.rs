use anyhow::Context;
use tokio::sync::watch;

use sweeper_core::impls::S3ObjectStore;
use sweeper_core::observability::init_logging;
use sweeper_core::{SweeperBuilder, SweeperConfig};

/// SIGINT / SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // (A) 設定の読み込み。不正ならループを始める前に落とす
    let config = SweeperConfig::from_env().context("invalid sweeper configuration")?;
    init_logging(config.log_format);
    tracing::info!(store = ?config.store, "configuration loaded");

    // (B) ストアと sweeper を組み立てる
    let store = S3ObjectStore::connect(&config.store).await;
    let sweeper = SweeperBuilder::from_config(&config, store)
        .build()
        .context("failed to build sweeper")?;

    // (C) バックグラウンドで起動し、シグナルで止める
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = sweeper.spawn(shutdown_rx);

    shutdown_signal().await;
    tracing::info!("shutdown requested, waiting for the current cycle to finish");
    shutdown_tx.send(true).ok();

    handle.await.context("sweeper task panicked")?;
    Ok(())
}
