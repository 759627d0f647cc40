//! 通知模块
//!
//! 提供短信发送和消息模板功能

pub mod sender;
pub mod sns;
pub mod template;

// 重新导出主要类型
pub use sender::{DeliveryReceipt, NoOpSender, NotificationSender};
pub use sns::SnsSender;
pub use template::{DefaultTemplate, HandlebarsTemplate, MessageTemplate};
