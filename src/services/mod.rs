//! 服务层模块

mod fragment_service;
mod query_service;

pub use fragment_service::render_fragment;
pub use query_service::build_query;
