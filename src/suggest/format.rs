//! 建议 API URL 构建工具

/// 建议端点路径
const SUGGEST_PATH: &str = "/Main";

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();

    // 修复双斜杠（跳过协议部分）
    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let mut fixed_rest = rest.to_string();
        while fixed_rest.contains("//") {
            fixed_rest = fixed_rest.replace("//", "/");
        }
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建建议端点
pub fn build_suggestion_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with(SUGGEST_PATH) {
        url
    } else {
        format!("{}{}", url, SUGGEST_PATH)
    }
}
