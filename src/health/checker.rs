//! HTTP健康检测器实现
//!
//! 对目标URL发起一次 GET 请求并对结果分类

use crate::config::CheckTarget;
use crate::error::HealthCheckError;
use crate::health::result::CheckOutcome;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// 健康检测器trait，定义检测接口
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// 对目标发起一次请求
    ///
    /// # 参数
    /// * `target` - 检测目标
    ///
    /// # 返回
    /// * `Result<ProbeResponse, HealthCheckError>` - 收到的响应，或传输层错误
    async fn probe(&self, target: &CheckTarget) -> Result<ProbeResponse, HealthCheckError>;
}

/// 已收到响应头、尚未读取响应体的HTTP响应
#[derive(Debug)]
pub struct ProbeResponse {
    response: Response,
}

impl ProbeResponse {
    /// HTTP状态码
    pub fn status_code(&self) -> u16 {
        self.response.status().as_u16()
    }

    /// 状态码的标准描述，如 "Service Unavailable"
    pub fn canonical_reason(&self) -> &'static str {
        self.response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
    }

    /// 读取完整响应体，非 UTF-8 内容按有损方式转换
    pub async fn read_body(self) -> Result<String, HealthCheckError> {
        let bytes = self
            .response
            .bytes()
            .await
            .map_err(HealthCheckError::BodyRead)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// HTTP健康检测器实现
///
/// 不设置超时、不附加请求头，完全使用传输层默认行为
pub struct HttpHealthChecker {
    /// HTTP客户端
    client: Client,
}

impl HttpHealthChecker {
    /// 创建新的HTTP健康检测器
    pub fn new() -> Result<Self, HealthCheckError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// 使用已有的客户端创建检测器
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthChecker for HttpHealthChecker {
    async fn probe(&self, target: &CheckTarget) -> Result<ProbeResponse, HealthCheckError> {
        let response = self.client.get(&target.url).send().await?;
        Ok(ProbeResponse { response })
    }
}

/// 按期望状态码对收到的响应分类
///
/// # 参数
/// * `target` - 检测目标
/// * `status_code` - 实际状态码
pub fn classify_status(target: &CheckTarget, status_code: u16) -> CheckOutcome {
    if i64::from(status_code) == target.expected_status {
        CheckOutcome::Success {
            url: target.url.clone(),
        }
    } else {
        CheckOutcome::UnexpectedStatus {
            status_code,
            url: target.url.clone(),
        }
    }
}
