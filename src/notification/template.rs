//! 消息模板模块
//!
//! 根据检测结果渲染短信内容

use crate::config::{CheckTarget, TemplateConfig};
use crate::error::NotificationError;
use crate::health::CheckOutcome;
use handlebars::Handlebars;
use serde_json::json;
use tracing::warn;

/// 消息模板trait
pub trait MessageTemplate: Send + Sync {
    /// 渲染短信内容
    ///
    /// # 参数
    /// * `outcome` - 检测结果
    /// * `target` - 检测目标
    ///
    /// # 返回
    /// * `Result<String, NotificationError>` - 渲染后的消息
    fn render(&self, outcome: &CheckOutcome, target: &CheckTarget)
        -> Result<String, NotificationError>;
}

/// 内置文案
///
/// 请求失败时直接使用传输错误的描述
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTemplate;

impl DefaultTemplate {
    pub fn message(outcome: &CheckOutcome) -> String {
        match outcome {
            CheckOutcome::TransportFailure { error } => error.clone(),
            CheckOutcome::UnexpectedStatus { status_code, url } => {
                format!("Incorrect status code received from {}: {}", url, status_code)
            }
            CheckOutcome::Success { url } => {
                format!("Health check successfully completed for {}", url)
            }
        }
    }
}

impl MessageTemplate for DefaultTemplate {
    fn render(
        &self,
        outcome: &CheckOutcome,
        _target: &CheckTarget,
    ) -> Result<String, NotificationError> {
        Ok(Self::message(outcome))
    }
}

/// Handlebars模板
///
/// 可用变量：`url`、`status_code`、`expected_status`、`error`。
/// 未配置覆盖的结果类型使用内置文案。
pub struct HandlebarsTemplate {
    registry: Handlebars<'static>,
}

impl HandlebarsTemplate {
    /// 编译配置中的模板
    ///
    /// # 参数
    /// * `config` - 模板覆盖配置
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 任一模板语法错误都会失败
    pub fn new(config: &TemplateConfig) -> Result<Self, NotificationError> {
        let mut registry = Handlebars::new();
        // 短信是纯文本，不做HTML转义
        registry.register_escape_fn(handlebars::no_escape);

        let templates = [
            ("transport_failure", &config.transport_failure),
            ("unexpected_status", &config.unexpected_status),
            ("success", &config.success),
        ];

        for (name, template) in templates {
            if let Some(template) = template {
                registry
                    .register_template_string(name, template)
                    .map_err(|e| NotificationError::Template(format!("{}: {}", name, e)))?;
            }
        }

        Ok(Self { registry })
    }
}

impl MessageTemplate for HandlebarsTemplate {
    fn render(
        &self,
        outcome: &CheckOutcome,
        target: &CheckTarget,
    ) -> Result<String, NotificationError> {
        let name = outcome.label();
        if !self.registry.has_template(name) {
            return Ok(DefaultTemplate::message(outcome));
        }

        let error = match outcome {
            CheckOutcome::TransportFailure { error } => Some(error.as_str()),
            _ => None,
        };
        let context = json!({
            "url": target.url,
            "status_code": outcome.status_code(),
            "expected_status": target.expected_status,
            "error": error,
        });

        self.registry
            .render(name, &context)
            .map_err(|e| NotificationError::Template(e.to_string()))
    }
}

/// 渲染短信内容，自定义模板渲染失败时退回内置文案
pub fn render_or_default(
    template: &dyn MessageTemplate,
    outcome: &CheckOutcome,
    target: &CheckTarget,
) -> String {
    match template.render(outcome, target) {
        Ok(message) => message,
        Err(e) => {
            warn!("短信模板渲染失败，使用内置文案: {}", e);
            DefaultTemplate::message(outcome)
        }
    }
}
