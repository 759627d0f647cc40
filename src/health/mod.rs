//! 健康检测模块
//!
//! 提供HTTP检测、结果分类和单次调用执行功能

pub mod checker;
pub mod evaluator;
pub mod result;

// 重新导出主要类型
pub use checker::{HealthChecker, HttpHealthChecker, ProbeResponse};
pub use evaluator::HealthCheckEvaluator;
pub use result::{CheckOutcome, DeliveryStatus, EvaluationReport};
