//! 日志系统模块
//!
//! 控制台和日志文件两个输出，可以同时启用；`log` crate 的记录通过 LogTracer 转入 tracing

use anyhow::Context;
use log::LevelFilter;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_log::{AsTrace, LogTracer};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer, Registry};

/// 装箱后的日志输出层
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 是否输出到标准错误
    pub console: bool,
    /// 日志文件路径，设置后追加写入，与控制台输出互不影响
    pub file_path: Option<PathBuf>,
    /// 模块级别日志控制
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let mut module_levels = HashMap::new();
        // AWS SDK 和 HTTP 栈在 info 级别过于啰嗦
        module_levels.insert("aws_config".to_string(), LevelFilter::Warn);
        module_levels.insert("aws_smithy_runtime".to_string(), LevelFilter::Warn);
        module_levels.insert("hyper_util".to_string(), LevelFilter::Warn);

        Self {
            level: LevelFilter::Info,
            json_format: false,
            console: true,
            file_path: None,
            module_levels,
        }
    }
}

impl LogConfig {
    /// 构建过滤器：`RUST_LOG` 可以补充按模块的规则，全局级别以配置为准
    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let mut filter =
            EnvFilter::from_default_env().add_directive(Directive::from(self.level.as_trace()));

        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level.as_str().to_ascii_lowercase())
                .parse::<Directive>()
                .with_context(|| format!("无效的模块日志级别: {module}"))?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }
}

/// 按配置构建输出层，每层带独立的过滤器
///
/// 控制台和文件都关闭时返回空列表
pub fn build_layers(config: &LogConfig) -> anyhow::Result<Vec<BoxedLayer>> {
    let mut layers = Vec::new();

    if config.console {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        let layer = if config.json_format {
            layer.json().with_current_span(true).boxed()
        } else {
            layer.with_target(false).boxed()
        };
        layers.push(layer.with_filter(config.env_filter()?).boxed());
    }

    if let Some(path) = &config.file_path {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("打开日志文件失败: {}", path.display()))?;

        let layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        let layer = if config.json_format {
            layer.json().with_current_span(true).boxed()
        } else {
            layer.boxed()
        };
        layers.push(layer.with_filter(config.env_filter()?).boxed());
    }

    Ok(layers)
}

/// 安装全局日志系统
///
/// 只有第一次调用生效，之后返回第一次的结果
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    INIT.get_or_init(|| install(config).map_err(|e| format!("{e:#}")))
        .clone()
        .map_err(|e| anyhow::anyhow!("日志系统初始化失败: {}", e))
}

fn install(config: &LogConfig) -> anyhow::Result<()> {
    let layers = build_layers(config)?;

    LogTracer::init_with_filter(config.level).context("LogTracer初始化失败")?;
    tracing::subscriber::set_global_default(registry().with(layers))
        .context("tracing subscriber初始化失败")?;

    tracing::debug!("日志配置: {:?}", config);
    Ok(())
}
