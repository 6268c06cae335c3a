//! 建议 API 模块
//!
//! 通过窄接口 `SuggestionProvider` 访问外部建议服务，测试时可替换为桩实现。

mod client;
mod format;
mod provider;
mod types;

pub use client::HttpSuggestionClient;
pub use provider::SuggestionProvider;
pub use types::*;
