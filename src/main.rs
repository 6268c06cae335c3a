//! Task Automation Advisor
//!
//! 使用 axum 框架构建的问卷服务：提供评估表单，并将提交的回答转发给建议 API。

use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod models;
mod services;
mod state;
mod suggest;
mod utils;

use api::create_app;
use config::AppConfig;
use state::create_shared_state;
use suggest::HttpSuggestionClient;

/// 等待单个信号；处理器注册失败时永不返回，避免服务启动后立即关闭
async fn wait_for_signal<F>(name: &str, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("Failed to install {} handler: {}", name, e);
        std::future::pending::<()>().await;
    }
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = wait_for_signal("Ctrl-C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automation_advisor=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Task Automation Advisor...");

    // 加载配置
    let config = AppConfig::load().context("failed to load configuration")?;
    if config.api_key.is_empty() {
        tracing::warn!("SUGGESTION_API_KEY is not set; submissions will fail until it is configured");
    }

    // 创建建议客户端和共享状态
    let client = HttpSuggestionClient::new(&config).context("failed to build HTTP client")?;
    info!("Suggestion API endpoint: {}", client.endpoint());
    let state = create_shared_state(Arc::new(client));

    // 构建路由
    let app = create_app(state, &config);

    let addr = config.bind_addr()?;
    info!("Server listening on: {}", addr);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
