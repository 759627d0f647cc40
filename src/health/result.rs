//! 健康检测结果数据结构
//!
//! 定义单次检测的结果分类和调用报告

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 单次检测的结果分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// 请求本身失败（DNS、连接、TLS、超时）
    TransportFailure { error: String },
    /// 收到了与期望不符的状态码
    UnexpectedStatus { status_code: u16, url: String },
    /// 状态码符合期望
    Success { url: String },
}

impl CheckOutcome {
    /// 判断结果是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckOutcome::Success { .. })
    }

    /// 观察到的HTTP状态码（请求失败时为 None）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CheckOutcome::UnexpectedStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// 用于日志的简短标签
    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::TransportFailure { .. } => "transport_failure",
            CheckOutcome::UnexpectedStatus { .. } => "unexpected_status",
            CheckOutcome::Success { .. } => "success",
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::TransportFailure { error } => write!(f, "请求失败: {}", error),
            CheckOutcome::UnexpectedStatus { status_code, url } => {
                write!(f, "状态码异常: {} -> {}", url, status_code)
            }
            CheckOutcome::Success { url } => write!(f, "正常: {}", url),
        }
    }
}

/// 通知发送情况
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// 服务商已受理
    Delivered { message_id: Option<String> },
    /// 发送失败
    Failed {
        /// 服务商错误码（如果有）
        code: Option<String>,
        error: String,
    },
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered { .. })
    }
}

/// 单次调用的报告
///
/// 调用总是会产生一份报告，任何失败都体现在字段里而不是错误返回值里
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// 调用ID
    pub id: Uuid,
    /// 检测开始时间
    pub timestamp: DateTime<Utc>,
    /// 目标URL
    pub url: String,
    /// 期望状态码
    pub expected_status: i64,
    /// 请求耗时
    #[serde(with = "duration_serde")]
    pub response_time: Duration,
    /// 结果分类
    pub outcome: CheckOutcome,
    /// 实际发送的短信内容
    pub message: String,
    /// 通知发送情况
    pub delivery: DeliveryStatus,
    /// 响应体字节数（仅成功且读取成功时）
    pub body_length: Option<usize>,
}

impl EvaluationReport {
    /// 获取响应时间（毫秒）
    pub fn response_time_ms(&self) -> u64 {
        self.response_time.as_millis() as u64
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
