//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Health SMS Probe 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 健康检测相关错误
    #[error("健康检测错误: {0}")]
    HealthCheck(#[from] HealthCheckError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 必填配置项缺失
    #[error("缺少必填配置项: {key}")]
    Missing { key: String },

    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 健康检测错误类型
#[derive(Error, Debug)]
pub enum HealthCheckError {
    /// HTTP请求错误（DNS、连接、TLS、超时）
    ///
    /// 显示文本即底层传输错误的描述，会原样作为短信内容发送
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// 响应体读取失败
    #[error("响应体读取失败: {0}")]
    BodyRead(reqwest::Error),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 服务商返回的结构化错误（带错误码）
    #[error("服务商错误 [{code}]: {message}")]
    Provider { code: String, message: String },

    /// 无错误码的通用发送错误（网络、凭证、SDK 内部错误等）
    #[error("通知发送失败: {0}")]
    Transport(String),

    /// 模板渲染错误
    #[error("模板渲染失败: {0}")]
    Template(String),
}

impl NotificationError {
    /// 服务商错误码（仅结构化错误才有）
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            NotificationError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 把错误及其 `source()` 链拼成一行文本
///
/// 已经出现在前文中的底层描述不会重复追加
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !cause_text.is_empty() && !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
