//! 问卷表单页面

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;
use std::sync::Arc;

/// 表单页面（编译期嵌入）
pub const FORM_HTML: &str = include_str!("../templates/form.html");

/// 返回固定的表单页面，忽略查询参数
async fn form_page() -> Html<&'static str> {
    Html(FORM_HTML)
}

/// 创建表单路由
pub fn form_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(form_page))
}
