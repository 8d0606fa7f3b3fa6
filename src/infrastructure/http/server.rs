//! HTTP Server
//!
//! 先绑定端口再开始服务，便于启动日志记录实际监听地址（port = 0 时由系统分配）

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 预检结果缓存时长
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// 组装路由与中间件
///
/// 只开放 GET/POST 和 JSON 请求头，外部 API 密钥只保存在服务端
fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    create_routes()
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = build_router(Arc::new(state), config.body_limit_bytes);
        Self { config, router }
    }

    /// 绑定监听地址
    pub async fn bind(self) -> io::Result<BoundServer> {
        let listener = TcpListener::bind(self.config.addr()).await?;
        Ok(BoundServer {
            listener,
            router: self.router,
        })
    }
}

/// 已绑定端口、尚未开始服务的服务器
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
}

impl BoundServer {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// 开始服务，`shutdown_signal` 完成后等待进行中的请求结束再返回
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(addr = %self.local_addr()?, "HTTP server listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal)
            .await
    }
}
