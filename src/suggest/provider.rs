//! 建议提供者接口

use async_trait::async_trait;

use super::types::SuggestError;
use crate::models::SubmissionRecord;

/// 根据一次问卷提交生成建议列表
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn generate_suggestions(
        &self,
        submission: &SubmissionRecord,
    ) -> Result<Vec<String>, SuggestError>;
}
