//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体大小上限（字节）
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, max_body_bytes: usize) -> Self {
        Self {
            host: host.into(),
            port,
            max_body_bytes,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        // webhook 请求体很小，限制大小防止滥用
        create_routes()
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    ///
    /// shutdown_signal 完成后停止接收新连接，并等待进行中的请求结束
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SystemClock;
    use crate::infrastructure::memory::InMemoryMessageStore;
    use crate::infrastructure::worker::MessageQueue;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::new("127.0.0.1", 9000, 1024);
        assert_eq!(config.addr(), "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let (queue, _receiver) = MessageQueue::bounded(4);
        let state = AppState::new(
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(queue),
            Arc::new(SystemClock),
        );
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0, 16), state);
        let router = server.build_router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from("x".repeat(1024)))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
