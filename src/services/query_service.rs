//! 查询构建服务
//!
//! 把七个问卷回答拼接为发送给建议 API 的自然语言查询

use crate::models::SubmissionRecord;

/// 查询前缀
const QUERY_PREFIX: &str = "Suggest ways to automate my work based on these answers \
(tasks to automate, most time-consuming tasks, current tools, progress tracking, \
challenges, tedious or error-prone tasks, goals): ";

/// 构建查询字符串
///
/// 回答顺序固定为 task1, task2, tools1, tracking1, pain1, pain2, goals1，以 ", " 分隔
pub fn build_query(record: &SubmissionRecord) -> String {
    let answers: Vec<&str> = record.answers().iter().map(|(_, value)| *value).collect();
    format!("{}{}", QUERY_PREFIX, answers.join(", "))
}
