//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口，每个参数都可以通过环境变量提供

use crate::config::types::{EXPECTED_RESPONSE_CODE_ENV, PHONE_NUM_ENV, TARGET_URL_ENV};
use crate::config::ConfigOverrides;
use crate::logging::LogConfig;
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Health SMS Probe - 单次HTTP健康检测并通过短信通知结果
#[derive(Parser, Debug, Clone)]
#[command(
    name = "health-sms-probe",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 目标URL
    #[arg(long, value_name = "URL", help = "要检测的URL", env = TARGET_URL_ENV)]
    pub target_url: Option<String>,

    /// 短信接收号码
    #[arg(long, value_name = "PHONE", help = "短信接收号码", env = PHONE_NUM_ENV)]
    pub phone_number: Option<String>,

    /// 期望状态码
    ///
    /// 保持原始字符串，无法解析时回退到 200
    #[arg(
        long,
        value_name = "CODE",
        help = "期望的HTTP状态码（默认200）",
        env = EXPECTED_RESPONSE_CODE_ENV
    )]
    pub expected_status: Option<String>,

    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径（可选）",
        env = "HEALTH_PROBE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "HEALTH_PROBE_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 日志格式
    #[arg(
        long,
        value_enum,
        default_value = "text",
        help = "日志格式",
        env = "HEALTH_PROBE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// 日志文件路径
    #[arg(
        long,
        value_name = "FILE",
        help = "同时把日志追加写入该文件",
        env = "HEALTH_PROBE_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,

    /// 关闭控制台日志
    #[arg(short, long, help = "不向标准错误输出日志（可配合 --log-file 使用）")]
    pub quiet: bool,

    /// 演练模式
    #[arg(long, help = "只记录短信内容，不真正发送")]
    pub dry_run: bool,

    /// 报告输出格式
    #[arg(long, value_enum, default_value = "none", help = "检测报告输出格式")]
    pub output: OutputFormat,
}

impl Args {
    /// 命令行/环境变量中的配置覆盖项，空字符串视为未设置
    pub fn overrides(&self) -> ConfigOverrides {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.clone().filter(|v| !v.is_empty())
        }

        ConfigOverrides {
            target_url: non_empty(&self.target_url),
            phone_number: non_empty(&self.phone_number),
            expected_status: non_empty(&self.expected_status),
        }
    }

    /// 根据参数生成日志配置
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone().into(),
            json_format: self.log_format == LogFormat::Json,
            console: !self.quiet,
            file_path: self.log_file.clone(),
            ..Default::default()
        }
    }
}

/// 解析命令行参数，失败时不退出进程
///
/// `--help`/`--version` 的输出和解析错误都写到终端，然后返回 None，
/// 由调用方正常结束
pub fn parse_args<I, T>(args: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => Some(args),
        Err(e) => {
            if let Err(print_err) = e.print() {
                eprintln!("{e}: {print_err}");
            }
            None
        }
    }
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 日志格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogFormat {
    /// 文本
    Text,
    /// JSON
    Json,
}

/// 报告输出格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 不输出
    None,
    /// 单行文本
    Text,
    /// JSON
    Json,
}
