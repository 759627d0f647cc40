//! 配置管理模块
//!
//! 提供环境变量、命令行与配置文件的解析、合并和验证功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ConfigLoader, EnvConfigLoader, TomlConfigLoader};
pub use types::{
    parse_expected_status, validate_config, CheckTarget, ConfigOverrides, FileConfig,
    NotificationTarget, ProbeConfig, TemplateConfig, DEFAULT_EXPECTED_STATUS,
};
