//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                          GET   健康检查
//! - /api/ai/status                     GET   服务状态
//! - /api/ai/capabilities               GET   能力报告
//! - /api/ai/probe                      POST  探测外部服务
//! - /api/ai/analyze-learning-style     POST  学习风格分析
//! - /api/ai/generate-content           POST  课程内容生成
//! - /api/ai/recommendations            POST  学习推荐
//! - /api/ai/generate-quiz              POST  测验生成
//! - /api/ai/dispatch                   POST  派发单个带标签的能力请求
//! - /api/ai/batch                      POST  批量派发

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/ai", ai_routes())
}

/// AI 路由
fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/capabilities", get(handlers::get_capabilities))
        .route("/probe", post(handlers::probe_external))
        .route("/analyze-learning-style", post(handlers::analyze_learning_style))
        .route("/generate-content", post(handlers::generate_content))
        .route("/recommendations", post(handlers::recommendations))
        .route("/generate-quiz", post(handlers::generate_quiz))
        .route("/dispatch", post(handlers::dispatch))
        .route("/batch", post(handlers::dispatch_batch))
}
