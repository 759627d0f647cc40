//! AWS SNS 短信发送器
//!
//! 通过 SNS `Publish` 接口直接向手机号发送短信

use crate::config::NotificationTarget;
use crate::error::NotificationError;
use crate::notification::sender::{DeliveryReceipt, NotificationSender};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_sns::Client;
use tracing::debug;

/// SNS短信发送器
pub struct SnsSender {
    /// SNS客户端
    client: Client,
}

impl SnsSender {
    /// 使用已构建的客户端创建发送器
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 从默认凭证链（环境变量、共享配置文件、实例角色等）创建发送器
    ///
    /// 每次调用创建一次，生命周期与本次调用相同
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        debug!("已加载AWS配置: region={:?}", config.region());
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl NotificationSender for SnsSender {
    async fn send_message(
        &self,
        message: &str,
        target: &NotificationTarget,
    ) -> Result<DeliveryReceipt, NotificationError> {
        debug!("发送短信到: {}", target.phone_number);

        let output = self
            .client
            .publish()
            .message(message)
            .phone_number(&target.phone_number)
            .send()
            .await
            .map_err(|e| map_publish_error(&e))?;

        Ok(DeliveryReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }

    fn name(&self) -> &'static str {
        "sns"
    }
}

/// 将SDK错误映射为通知错误：带错误码的是服务商错误，其余归为通用发送错误
fn map_publish_error<E>(err: &E) -> NotificationError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    classify_publish_error(
        err.code(),
        err.message(),
        DisplayErrorContext(err).to_string(),
    )
}

fn classify_publish_error(
    code: Option<&str>,
    message: Option<&str>,
    detail: String,
) -> NotificationError {
    match code {
        Some(code) => NotificationError::Provider {
            code: code.to_string(),
            message: message.map(str::to_string).unwrap_or(detail),
        },
        None => NotificationError::Transport(detail),
    }
}
