//! API 路由模块

mod form;
mod health;
mod submit;

pub use form::form_routes;
pub use health::health_routes;
pub use submit::submit_routes;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::AppConfig;
use crate::state::AppState;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(form_routes())
        .merge(submit_routes())
        .merge(health_routes())
        .with_state(state)
}

/// 根据配置构建 CORS 策略
///
/// 包含 "*" 时允许所有来源（不携带凭证）；否则只允许列出的来源并允许凭证
pub fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // 携带凭证时不能使用通配符方法/请求头
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("hx-request"),
            HeaderName::from_static("hx-target"),
            HeaderName::from_static("hx-trigger"),
            HeaderName::from_static("hx-current-url"),
        ])
        .allow_credentials(true)
}

/// 构建完整应用：路由 + CORS + 请求日志
pub fn create_app(state: Arc<AppState>, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_api_routes(state))
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
