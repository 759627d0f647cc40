//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use crate::config::NotificationTarget;
use crate::error::NotificationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 服务商受理回执
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// 服务商返回的消息ID
    pub message_id: Option<String>,
}

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送一条短信
    ///
    /// # 参数
    /// * `message` - 短信内容
    /// * `target` - 接收方
    ///
    /// # 返回
    /// * `Result<DeliveryReceipt, NotificationError>` - 服务商回执或发送错误
    async fn send_message(
        &self,
        message: &str,
        target: &NotificationTarget,
    ) -> Result<DeliveryReceipt, NotificationError>;

    /// 发送器名称，用于日志
    fn name(&self) -> &'static str;
}

/// 空的通知发送器实现（用于演练或禁用通知）
///
/// 只记录日志，不会真正发送
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_message(
        &self,
        message: &str,
        target: &NotificationTarget,
    ) -> Result<DeliveryReceipt, NotificationError> {
        info!(
            "演练模式，跳过发送: to={} message={}",
            target.phone_number, message
        );
        Ok(DeliveryReceipt::default())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
