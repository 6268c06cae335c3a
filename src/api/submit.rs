//! 问卷提交端点
//!
//! 接收 JSON 或表单提交，转发给建议 API，并按提交方式返回 JSON 或 HTML 片段。

use axum::{
    async_trait,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{ResponseMode, SubmissionRecord, SuggestionsResponse};
use crate::services::render_fragment;
use crate::state::AppState;
use crate::utils::generate_request_id;

/// 已解析的提交，附带响应格式
#[derive(Debug)]
pub struct Submission {
    pub record: SubmissionRecord,
    pub mode: ResponseMode,
}

/// 根据 Content-Type 判断提交方式
fn detect_mode(content_type: &str) -> Option<ResponseMode> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        Some(ResponseMode::Json)
    } else if mime == "application/x-www-form-urlencoded" {
        Some(ResponseMode::Html)
    } else {
        None
    }
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        // 媒体类型大小写不敏感：先判定格式再按字节解码，所有解析失败（包括缺字段）都映射为 400
        let mode = detect_mode(content_type).ok_or_else(|| {
            AppError::BadRequest(
                "Invalid input: expected a JSON or URL-encoded form body".to_string(),
            )
        })?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e.body_text())))?;

        let record = match mode {
            ResponseMode::Json => serde_json::from_slice::<SubmissionRecord>(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))?,
            ResponseMode::Html => serde_urlencoded::from_bytes::<SubmissionRecord>(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))?,
        };

        Ok(Self { record, mode })
    }
}

/// 处理问卷提交
async fn submit(
    State(state): State<Arc<AppState>>,
    submission: Submission,
) -> AppResult<Response> {
    let request_id = generate_request_id();
    info!(
        "Submission received: request_id={}, mode={:?}",
        request_id, submission.mode
    );

    let suggestions = state
        .provider
        .generate_suggestions(&submission.record)
        .await
        .map_err(|e| {
            error!("Suggestion request failed: request_id={}, error={}", request_id, e);
            AppError::from(e)
        })?;

    info!(
        "Submission completed: request_id={}, suggestions={}",
        request_id,
        suggestions.len()
    );

    let response = match submission.mode {
        ResponseMode::Json => Json(SuggestionsResponse { suggestions }).into_response(),
        ResponseMode::Html => {
            Html(render_fragment(&submission.record, &suggestions)).into_response()
        }
    };
    Ok(response)
}

/// 非 POST 请求
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// 创建提交路由
///
/// 回答长度不受限制，因此关闭默认的 2 MiB 请求体上限
pub fn submit_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(submit).fallback(method_not_allowed))
        .layer(DefaultBodyLimit::disable())
}
