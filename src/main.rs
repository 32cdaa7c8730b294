//! Tidings - 语音助手留言技能
//!
//! - Domain: messaging/
//! - Application: commands, ports
//! - Infrastructure: http, memory, worker, persistence

use std::sync::Arc;

use tidings::application::{MessageStorePort, SystemClock};
use tidings::config::{load_config, print_config, AppConfig, StorageBackend};
use tidings::infrastructure::http::{AppState, HttpServer, ServerConfig};
use tidings::infrastructure::memory::InMemoryMessageStore;
use tidings::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteMessageStore,
};
use tidings::infrastructure::worker::{FlushWorker, FlushWorkerConfig, MessageQueue};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Tidings - 留言技能");
    print_config(&config);

    let store = build_store(&config).await?;

    // 创建消息队列和批量写入 Worker
    let (queue, receiver) = MessageQueue::bounded(config.worker.queue_capacity);
    let worker_config = FlushWorkerConfig {
        flush_interval: config.worker.flush_interval(),
        max_pending: config.worker.max_pending,
    };
    let worker = FlushWorker::new(worker_config, receiver, store.clone()).spawn();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.server.max_body_bytes,
    );
    let state = AppState::new(store, Arc::new(queue), Arc::new(SystemClock));
    let server = HttpServer::new(server_config, state);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    // 启动服务器（带优雅关闭）
    server.run_with_shutdown(shutdown.cancelled_owned()).await?;
    tracing::info!("HTTP server stopped");

    // 服务器停止后，写完队列里剩下的消息
    match worker.shutdown().await {
        Ok(outcome) => tracing::info!(?outcome, "FlushWorker stopped"),
        Err(e) => tracing::error!(error = %e, "FlushWorker panicked"),
    }

    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},tidings={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn MessageStorePort>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, messages are lost on restart");
            Ok(Arc::new(InMemoryMessageStore::new()))
        }
        StorageBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let db_config = DatabaseConfig {
                database_url: config.database.database_url(),
                max_connections: config.database.max_connections,
            };
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(SqliteMessageStore::new(pool)))
        }
    }
}

async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Received shutdown signal");
    shutdown.cancel();
}
