//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

/// 一次完整的问卷提交
///
/// 七个字段均为必填，只校验存在性，不校验内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub task1: String,
    pub task2: String,
    pub tools1: String,
    pub tracking1: String,
    pub pain1: String,
    pub pain2: String,
    pub goals1: String,
}

impl SubmissionRecord {
    /// 按固定顺序返回 (问题标题, 回答)
    pub fn answers(&self) -> [(&'static str, &str); 7] {
        [
            ("Tasks that could be automated", &self.task1),
            ("Most time-consuming tasks", &self.task2),
            ("Current tools", &self.tools1),
            ("Progress tracking", &self.tracking1),
            ("Challenges", &self.pain1),
            ("Tedious or error-prone tasks", &self.pain2),
            ("Automation goals", &self.goals1),
        ]
    }
}

/// 建议列表响应，同时也是建议 API 成功响应的格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// 响应格式，跟随提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// JSON 提交 → JSON 响应
    Json,
    /// 表单提交 → HTML 片段
    Html,
}
