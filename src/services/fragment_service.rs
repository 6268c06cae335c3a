//! HTML 片段渲染
//!
//! 表单提交（htmx）时返回的片段：回显回答 + 建议列表

use std::fmt::Write;

use crate::models::SubmissionRecord;

/// HTML 转义
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 渲染建议片段
pub fn render_fragment(record: &SubmissionRecord, suggestions: &[String]) -> String {
    let mut html = String::from("<div class=\"suggestions\">\n<h2>Your Answers</h2>\n<dl>\n");

    // write! 写入 String 不会失败
    for (question, answer) in record.answers() {
        let _ = writeln!(
            html,
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(question),
            escape_html(answer)
        );
    }
    html.push_str("</dl>\n<h2>Suggestions</h2>\n<ul>\n");
    for suggestion in suggestions {
        let _ = writeln!(html, "<li>{}</li>", escape_html(suggestion));
    }
    html.push_str("</ul>\n");

    html.push_str("</div>\n");
    html
}
