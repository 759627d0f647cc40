//! 命令行接口模块
//!
//! 提供CLI参数解析和单次调用的组装

pub mod args;
pub mod commands;

// 重新导出主要类型
pub use args::{parse_args, Args, LogFormat, LogLevel, OutputFormat};
pub use commands::{build_evaluator, format_report, load_config, run_probe};
