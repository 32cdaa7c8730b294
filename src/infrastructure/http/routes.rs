//! HTTP Routes
//!
//! API Endpoints:
//! - /      POST  语音平台 webhook（其他方法返回 405）
//! - /ping  GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::webhook))
        .route("/ping", get(handlers::health))
}
