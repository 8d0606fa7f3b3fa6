//! Tutorly - 自适应学习混合推理服务
//!
//! - Domain: learning/, fallback/
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, adapters

use std::sync::Arc;
use std::time::Duration;

use tutorly::application::{ExternalInferencePort, ProbeExternalCommand, ProbeExternalHandler};
use tutorly::config::{load_config, print_config, LogConfig};
use tutorly::domain::fallback::FallbackEngine;
use tutorly::infrastructure::adapters::OpenAiClient;
use tutorly::infrastructure::http::{AppState, HttpServer};
use tutorly::infrastructure::memory::InMemoryStatusCache;

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},tutorly={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenv::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > OPENAI_* > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Tutorly - 自适应学习混合推理服务");
    print_config(&config);

    // 模板表不完整时拒绝启动
    let fallback = Arc::new(
        FallbackEngine::new().map_err(|e| anyhow::anyhow!("Invalid fallback templates: {}", e))?,
    );

    let status = InMemoryStatusCache::new(config.inference.external_settings()).arc();

    // 仅在存在密钥时创建外部客户端
    let external: Option<Arc<dyn ExternalInferencePort>> = match config.inference.client_config() {
        Some(client_config) => {
            let client: Arc<dyn ExternalInferencePort> = Arc::new(
                OpenAiClient::new(client_config)
                    .map_err(|e| anyhow::anyhow!("Failed to create inference client: {}", e))?,
            );
            Some(client)
        }
        None => {
            tracing::warn!("No API key configured, serving local fallback only");
            None
        }
    };

    if config.inference.probe_on_startup {
        let probe = ProbeExternalHandler::new(external.clone(), status.clone());
        let snapshot = probe.handle(ProbeExternalCommand).await;
        tracing::info!(
            external_available = snapshot.external_available,
            "Startup probe finished"
        );
    }

    let state = AppState::new(
        external,
        fallback,
        status,
        Duration::from_secs(config.inference.timeout_secs),
    );

    let server = HttpServer::new(config.server.clone(), state)
        .bind()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.server.addr(), e))?;

    // 启动服务器（带优雅关闭）
    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
