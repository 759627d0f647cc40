//! 单次调用的组装与执行
//!
//! 加载配置、构建检测器和发送器，执行一次检测

use crate::cli::args::{Args, OutputFormat};
use crate::config::{ConfigLoader, ProbeConfig, TomlConfigLoader};
use crate::error::Result;
use crate::health::{EvaluationReport, HealthCheckEvaluator, HttpHealthChecker};
use crate::notification::{
    HandlebarsTemplate, MessageTemplate, NoOpSender, NotificationSender, SnsSender,
};
use std::sync::Arc;
use tracing::{error, info};

/// 加载并合并配置
///
/// 命令行参数与环境变量优先于配置文件
pub async fn load_config(args: &Args) -> Result<ProbeConfig> {
    let file = match &args.config {
        Some(path) => Some(TomlConfigLoader::new(true).load_from_file(path).await?),
        None => None,
    };

    Ok(ProbeConfig::resolve(file, args.overrides())?)
}

/// 根据配置构建执行器
///
/// 每次调用各自创建HTTP客户端和短信客户端
pub async fn build_evaluator(args: &Args, config: ProbeConfig) -> Result<HealthCheckEvaluator> {
    let checker = Arc::new(HttpHealthChecker::new()?);

    let sender: Arc<dyn NotificationSender> = if args.dry_run {
        Arc::new(NoOpSender)
    } else {
        Arc::new(SnsSender::from_env().await)
    };

    let mut evaluator =
        HealthCheckEvaluator::new(config.target, config.notification, checker, sender);

    if !config.templates.is_empty() {
        let template: Arc<dyn MessageTemplate> =
            Arc::new(HandlebarsTemplate::new(&config.templates)?);
        evaluator = evaluator.with_template(template);
    }

    Ok(evaluator)
}

/// 执行一次检测
///
/// 配置或初始化失败时只记录错误并返回 `None`，不会发送短信
pub async fn run_probe(args: &Args) -> Option<EvaluationReport> {
    let config = match load_config(args).await {
        Ok(config) => config,
        Err(e) => {
            error!("加载配置失败，跳过本次检测: {}", e);
            return None;
        }
    };

    let evaluator = match build_evaluator(args, config).await {
        Ok(evaluator) => evaluator,
        Err(e) => {
            error!("初始化失败，跳过本次检测: {}", e);
            return None;
        }
    };

    let report = evaluator.run().await;
    info!(
        "检测完成: {} ({}ms)",
        report.outcome.label(),
        report.response_time_ms()
    );
    Some(report)
}

/// 按输出格式渲染报告
pub fn format_report(report: &EvaluationReport, format: &OutputFormat) -> Result<Option<String>> {
    let rendered = match format {
        OutputFormat::None => None,
        OutputFormat::Text => {
            let status_icon = if report.outcome.is_healthy() {
                "✓"
            } else {
                "✗"
            };
            Some(format!(
                "{} {} - {} - {}ms - {}",
                status_icon,
                report.url,
                report.outcome,
                report.response_time_ms(),
                if report.delivery.is_delivered() {
                    "短信已发送"
                } else {
                    "短信发送失败"
                }
            ))
        }
        OutputFormat::Json => Some(report.to_json()?),
    };
    Ok(rendered)
}
