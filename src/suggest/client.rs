//! 建议 API HTTP 客户端

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::format::build_suggestion_endpoint;
use super::provider::SuggestionProvider;
use super::types::{SuggestError, SuggestRequest};
use crate::config::AppConfig;
use crate::models::{SubmissionRecord, SuggestionsResponse};
use crate::services::build_query;
use crate::utils::{mask_api_key, truncate_for_log};

/// 建议 API 客户端
///
/// 启动时根据配置构建一次，之后在所有请求间共享
pub struct HttpSuggestionClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl HttpSuggestionClient {
    /// 创建新的客户端
    ///
    /// 密钥为空时不会报错，服务仍可提供表单；调用时才返回 `MissingCredential`
    pub fn new(config: &AppConfig) -> Result<Self, SuggestError> {
        // 只设置连接超时，请求本身不设上限
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: build_suggestion_endpoint(&config.api_base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionClient {
    async fn generate_suggestions(
        &self,
        submission: &SubmissionRecord,
    ) -> Result<Vec<String>, SuggestError> {
        if self.api_key.trim().is_empty() {
            return Err(SuggestError::MissingCredential);
        }

        let payload = SuggestRequest {
            query: build_query(submission),
        };

        debug!(
            "Suggestion API request: endpoint={}, api_key={}, query_len={}",
            self.endpoint,
            mask_api_key(&self.api_key),
            payload.query.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        // 检查状态码
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Suggestion API error: status={}, body={}",
                status.as_u16(),
                truncate_for_log(&body, 500)
            );
            return Err(SuggestError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: SuggestionsResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse suggestion response: {}, body={}",
                e,
                truncate_for_log(&body, 500)
            );
            SuggestError::InvalidResponse(e)
        })?;

        debug!("Suggestion API returned {} suggestions", parsed.suggestions.len());
        Ok(parsed.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// 在随机端口启动一个模拟建议 API，返回其基础 URL
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config_for(base_url: &str, api_key: &str) -> AppConfig {
        AppConfig {
            api_base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    fn submission() -> SubmissionRecord {
        SubmissionRecord {
            task1: "email sorting".into(),
            task2: "invoicing".into(),
            tools1: "Excel".into(),
            tracking1: "spreadsheet".into(),
            pain1: "manual entry".into(),
            pain2: "duplicate records".into(),
            goals1: "save time".into(),
        }
    }

    #[tokio::test]
    async fn test_generate_suggestions_success() {
        let captured: Arc<Mutex<Option<(String, Value)>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&captured);

        let router = Router::new().route(
            "/Main",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *sink.lock().unwrap() = Some((auth, body));
                Json(json!({
                    "suggestions": [
                        "Automate email sorting with rules",
                        "Use invoicing software"
                    ]
                }))
            }),
        );
        let base_url = spawn_upstream(router).await;

        let client = HttpSuggestionClient::new(&config_for(&base_url, "test-token")).unwrap();
        let suggestions = client.generate_suggestions(&submission()).await.unwrap();

        assert_eq!(
            suggestions,
            vec!["Automate email sorting with rules", "Use invoicing software"]
        );

        let (auth, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer test-token");
        assert_eq!(body["query"], json!(build_query(&submission())));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_request() {
        // 端口 9 不会被访问：缺少密钥时直接失败
        let client = HttpSuggestionClient::new(&config_for("http://127.0.0.1:9", "")).unwrap();
        let err = client.generate_suggestions(&submission()).await.unwrap_err();
        assert!(matches!(err, SuggestError::MissingCredential));

        let client =
            HttpSuggestionClient::new(&config_for("http://127.0.0.1:9", "   ")).unwrap();
        let err = client.generate_suggestions(&submission()).await.unwrap_err();
        assert!(matches!(err, SuggestError::MissingCredential));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let router = Router::new().route(
            "/Main",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base_url = spawn_upstream(router).await;

        let client = HttpSuggestionClient::new(&config_for(&base_url, "test-token")).unwrap();
        let err = client.generate_suggestions(&submission()).await.unwrap_err();

        match &err {
            SuggestError::Upstream { status, .. } => assert_eq!(*status, 503),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("503 Service Unavailable"));
        assert!(!err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_missing_suggestions_key() {
        let router = Router::new().route(
            "/Main",
            post(|| async { Json(json!({ "results": ["nope"] })) }),
        );
        let base_url = spawn_upstream(router).await;

        let client = HttpSuggestionClient::new(&config_for(&base_url, "test-token")).unwrap();
        let err = client.generate_suggestions(&submission()).await.unwrap_err();
        assert!(matches!(err, SuggestError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // 先绑定再释放，得到一个当前无人监听的端口
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpSuggestionClient::new(&config_for(&format!("http://{}", addr), "test-token"))
                .unwrap();
        let err = client.generate_suggestions(&submission()).await.unwrap_err();
        assert!(matches!(err, SuggestError::Http(_)));
    }

    #[test]
    fn test_endpoint_from_config() {
        let client =
            HttpSuggestionClient::new(&config_for("https://suggest.example.com/", "k")).unwrap();
        assert_eq!(client.endpoint(), "https://suggest.example.com/Main");
    }
}
