//! 应用配置管理
//!
//! 启动时一次性构建配置对象（默认值 → 配置文件 → 环境变量），
//! 之后以只读方式传入各组件，业务逻辑中不再直接读取环境变量。

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::error::AppError;

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("APP_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    // 配置文件位于可执行文件同级目录
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 建议 API 密钥
    #[serde(default)]
    pub api_key: String,

    /// 建议 API 基础 URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// 允许跨域访问的来源，"*" 表示全部
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// 连接超时（秒）
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    "https://api.taskautomation.example".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            allowed_origins: default_allowed_origins(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 → config.json（若存在）→ 环境变量
    pub fn load() -> Result<Self, AppError> {
        let mut config = load_config_from_file()?.unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.normalize();
        Ok(config)
    }

    /// 清理首尾空白，无论取值来自配置文件还是环境变量
    pub fn normalize(&mut self) {
        self.api_key = self.api_key.trim().to_string();
        self.api_base_url = self.api_base_url.trim().to_string();
        self.host = self.host.trim().to_string();
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 抽象了环境变量读取，便于测试时注入
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(api_key) = lookup("SUGGESTION_API_KEY") {
            self.api_key = api_key.trim().to_string();
        }
        if let Some(base_url) = lookup("SUGGESTION_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = base_url.trim().to_string();
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS").filter(|v| !v.trim().is_empty()) {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// 服务监听地址
    ///
    /// 支持 IPv4/IPv6 字面量（如 `::`，可带方括号）以及主机名（如 `localhost`）
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        (host, self.port)
            .to_socket_addrs()
            .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", self.host, e)))?
            .next()
            .ok_or_else(|| {
                AppError::Config(format!("Bind address '{}' did not resolve", self.host))
            })
    }
}

/// 从文件加载配置
///
/// 文件不存在时返回 `None`；文件存在但无法读取或解析时报错
fn load_config_from_file() -> Result<Option<AppConfig>, AppError> {
    let path = get_config_path();
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("读取配置文件失败 {}: {}", path.display(), e)))?;
    let config = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件失败 {}: {}", path.display(), e)))?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.api_key.is_empty());
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.api_base_url, "https://api.taskautomation.example");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("PORT", "3000"),
                ("SUGGESTION_API_KEY", " secret-token "),
                ("SUGGESTION_API_URL", "https://suggest.internal"),
                ("ALLOWED_ORIGINS", "https://a.test, https://b.test,"),
            ]))
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.api_key, "secret-token");
        assert_eq!(config.api_base_url, "https://suggest.internal");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn test_empty_port_falls_back() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[("PORT", "")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8765,
            ..Default::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8765");
    }

    #[test]
    fn test_bind_addr_ipv6_and_hostname() {
        let mut config = AppConfig {
            host: "::".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "[::]:8080");

        config.host = "[::1]".to_string();
        assert_eq!(config.bind_addr().unwrap().to_string(), "[::1]:8080");

        config.host = "localhost".to_string();
        let addr = config.bind_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_normalize_trims_file_values() {
        let mut config: AppConfig =
            serde_json::from_str(r#"{"api_key": "   ", "api_base_url": " https://a.test/ "}"#)
                .unwrap();
        config.apply_env_overrides(env(&[])).unwrap();
        config.normalize();

        assert!(config.api_key.is_empty());
        assert_eq!(config.api_base_url, "https://a.test/");
    }
}
