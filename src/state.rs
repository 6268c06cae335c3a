//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。状态只读，请求之间无需加锁。

use std::sync::Arc;

use crate::suggest::SuggestionProvider;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 建议提供者（生产环境为 HTTP 客户端，测试中为桩实现）
    pub provider: Arc<dyn SuggestionProvider>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self { provider }
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(provider: Arc<dyn SuggestionProvider>) -> Arc<AppState> {
    Arc::new(AppState::new(provider))
}
