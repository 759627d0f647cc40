//! 配置数据结构定义
//!
//! 定义检测目标、通知目标以及配置文件结构和验证逻辑

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 目标URL环境变量
pub const TARGET_URL_ENV: &str = "TARGET_URL";
/// 短信接收号码环境变量
pub const PHONE_NUM_ENV: &str = "PHONE_NUM";
/// 期望状态码环境变量
pub const EXPECTED_RESPONSE_CODE_ENV: &str = "EXPECTED_RESPONSE_CODE";

/// 未配置或无法解析时使用的期望状态码
pub const DEFAULT_EXPECTED_STATUS: i64 = 200;

/// 检测目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTarget {
    /// 目标URL
    pub url: String,
    /// 期望的成功状态码
    ///
    /// 按任意整数保存，不在HTTP状态码范围内的值永远不会匹配
    pub expected_status: i64,
}

impl CheckTarget {
    /// 创建检测目标
    ///
    /// # 参数
    /// * `url` - 目标URL
    /// * `expected_status` - 原始期望状态码配置（可能缺失或非法）
    pub fn new(url: impl Into<String>, expected_status: Option<&str>) -> Self {
        Self {
            url: url.into(),
            expected_status: parse_expected_status(expected_status),
        }
    }
}

/// 通知目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    /// 短信接收号码
    pub phone_number: String,
}

impl NotificationTarget {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
        }
    }
}

/// 解析期望状态码
///
/// 缺失或非整数时静默回退到 200，不视为错误
pub fn parse_expected_status(raw: Option<&str>) -> i64 {
    match raw.map(str::parse::<i64>) {
        Some(Ok(code)) => code,
        Some(Err(_)) => {
            tracing::debug!("期望状态码 {:?} 无法解析，使用默认值", raw);
            DEFAULT_EXPECTED_STATUS
        }
        None => DEFAULT_EXPECTED_STATUS,
    }
}

/// 配置文件结构（TOML）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    /// 检测目标配置
    #[serde(default)]
    pub target: TargetSection,
    /// 通知配置
    #[serde(default)]
    pub notification: NotificationSection,
    /// 短信模板覆盖
    #[serde(default)]
    pub templates: TemplateConfig,
}

/// `[target]` 配置段
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetSection {
    /// 目标URL
    pub url: Option<String>,
    /// 期望状态码，允许写成字符串或整数
    pub expected_status: Option<RawStatus>,
}

/// `[notification]` 配置段
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationSection {
    /// 短信接收号码
    pub phone_number: Option<String>,
}

/// 配置文件中的原始状态码
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawStatus {
    Number(i64),
    Text(String),
}

impl RawStatus {
    /// 转为字符串形式，交给 [`parse_expected_status`] 统一处理
    pub fn as_raw(&self) -> String {
        match self {
            RawStatus::Number(n) => n.to_string(),
            RawStatus::Text(s) => s.clone(),
        }
    }
}

/// 各类结果对应的 Handlebars 模板覆盖
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateConfig {
    /// 请求失败时的模板
    pub transport_failure: Option<String>,
    /// 状态码不符时的模板
    pub unexpected_status: Option<String>,
    /// 检测成功时的模板
    pub success: Option<String>,
}

impl TemplateConfig {
    /// 是否未配置任何模板
    pub fn is_empty(&self) -> bool {
        self.transport_failure.is_none()
            && self.unexpected_status.is_none()
            && self.success.is_none()
    }
}

/// 来自命令行参数或环境变量的配置，优先级高于配置文件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub target_url: Option<String>,
    pub phone_number: Option<String>,
    pub expected_status: Option<String>,
}

/// 单次调用的完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// 检测目标
    pub target: CheckTarget,
    /// 通知目标
    pub notification: NotificationTarget,
    /// 短信模板覆盖
    pub templates: TemplateConfig,
}

impl ProbeConfig {
    /// 合并配置文件与覆盖项，并验证结果
    ///
    /// # 参数
    /// * `file` - 配置文件内容（可选）
    /// * `overrides` - 命令行/环境变量覆盖项
    ///
    /// # 返回
    /// * `Result<Self, ConfigError>` - 合并后的配置
    pub fn resolve(
        file: Option<FileConfig>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let url = overrides
            .target_url
            .or(file.target.url)
            .ok_or_else(|| ConfigError::Missing {
                key: TARGET_URL_ENV.to_string(),
            })?;

        let phone_number = overrides
            .phone_number
            .or(file.notification.phone_number)
            .ok_or_else(|| ConfigError::Missing {
                key: PHONE_NUM_ENV.to_string(),
            })?;

        let expected_status = overrides
            .expected_status
            .or_else(|| file.target.expected_status.as_ref().map(RawStatus::as_raw));

        let config = Self {
            target: CheckTarget::new(url, expected_status.as_deref()),
            notification: NotificationTarget::new(phone_number),
            templates: file.templates,
        };

        validate_config(&config).map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &ProbeConfig) -> Result<(), String> {
    let url = config.target.url.trim();
    if url.is_empty() {
        return Err("目标URL不能为空".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("目标URL格式无效: {}", config.target.url));
    }

    if config.notification.phone_number.trim().is_empty() {
        return Err("短信接收号码不能为空".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(url: &str, phone: &str) -> ConfigOverrides {
        ConfigOverrides {
            target_url: Some(url.to_string()),
            phone_number: Some(phone.to_string()),
            expected_status: None,
        }
    }

    #[test]
    fn test_parse_expected_status() {
        assert_eq!(parse_expected_status(None), 200);
        assert_eq!(parse_expected_status(Some("201")), 201);
        assert_eq!(parse_expected_status(Some("abc")), 200);
        assert_eq!(parse_expected_status(Some("")), 200);
        assert_eq!(parse_expected_status(Some("+201")), 201);
        assert_eq!(parse_expected_status(Some(" 201")), 200);
        // 数字但不是合法状态码：保留原值，而不是回退到 200
        assert_eq!(parse_expected_status(Some("70000")), 70000);
        assert_eq!(parse_expected_status(Some("-1")), -1);
        assert_eq!(parse_expected_status(Some("99999999999999999999")), 200);
    }

    #[test]
    fn test_resolve_from_overrides() {
        let config =
            ProbeConfig::resolve(None, overrides("https://example.com", "+15555550100")).unwrap();

        assert_eq!(config.target.url, "https://example.com");
        assert_eq!(config.target.expected_status, 200);
        assert_eq!(config.notification.phone_number, "+15555550100");
        assert!(config.templates.is_empty());
    }

    #[test]
    fn test_overrides_take_precedence_over_file() {
        let file = FileConfig {
            target: TargetSection {
                url: Some("https://file.example.com".to_string()),
                expected_status: Some(RawStatus::Number(204)),
            },
            notification: NotificationSection {
                phone_number: Some("+15555550101".to_string()),
            },
            templates: TemplateConfig::default(),
        };

        let mut ov = ConfigOverrides {
            target_url: Some("https://cli.example.com".to_string()),
            ..Default::default()
        };
        let config = ProbeConfig::resolve(Some(file.clone()), ov.clone()).unwrap();
        assert_eq!(config.target.url, "https://cli.example.com");
        assert_eq!(config.target.expected_status, 204);
        assert_eq!(config.notification.phone_number, "+15555550101");

        ov.expected_status = Some("201".to_string());
        let config = ProbeConfig::resolve(Some(file), ov).unwrap();
        assert_eq!(config.target.expected_status, 201);
    }

    #[test]
    fn test_missing_required_values() {
        let err = ProbeConfig::resolve(None, ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref key } if key == TARGET_URL_ENV));

        let ov = ConfigOverrides {
            target_url: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let err = ProbeConfig::resolve(None, ov).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref key } if key == PHONE_NUM_ENV));
    }

    #[test]
    fn test_validate_config() {
        let err = ProbeConfig::resolve(None, overrides("ftp://example.com", "+1555")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = ProbeConfig::resolve(None, overrides("https://example.com", "  ")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_raw_status_as_raw() {
        assert_eq!(RawStatus::Number(201).as_raw(), "201");
        assert_eq!(RawStatus::Text("oops".to_string()).as_raw(), "oops");
    }
}
