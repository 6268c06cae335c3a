//! 建议 API 类型定义

use serde::Serialize;

/// 建议 API 请求载荷
#[derive(Debug, Clone, Serialize)]
pub struct SuggestRequest {
    pub query: String,
}

/// 建议 API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// 未配置 API 密钥
    #[error("Suggestion API key is not configured")]
    MissingCredential,

    /// HTTP 请求错误
    #[error("Suggestion API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API 返回非成功状态
    #[error("Suggestion API returned {status} {reason}")]
    Upstream { status: u16, reason: String },

    /// 响应体无法解析
    #[error("Suggestion API returned an invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
