//! Health SMS Probe - 单次HTTP健康检测与短信通知
//!
//! 每次调用：
//! - 对目标URL发起一次 GET 请求
//! - 按期望状态码对结果分类
//! - 通过 AWS SNS 发送一条短信描述结果
//!
//! 任何失败都只记录日志，调用本身总是正常结束。

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::{CheckTarget, NotificationTarget, ProbeConfig};
pub use error::AppError;
pub use health::{CheckOutcome, EvaluationReport, HealthCheckEvaluator};
pub use notification::{NotificationSender, SnsSender};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
