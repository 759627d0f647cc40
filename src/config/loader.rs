//! 配置加载器实现
//!
//! 提供环境变量读取、TOML配置文件解析和环境变量替换功能

use crate::config::types::{
    ConfigOverrides, FileConfig, EXPECTED_RESPONSE_CODE_ENV, PHONE_NUM_ENV, TARGET_URL_ENV,
};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置文件加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<FileConfig>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<FileConfig>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<FileConfig>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<FileConfig>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析TOML内容
    fn parse_toml(&self, content: &str) -> Result<FileConfig> {
        let processed_content = self.substitute_env_vars(content)?;

        let config: FileConfig = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }
}

impl Default for TomlConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<FileConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_toml(&content)?;

        tracing::info!("成功加载配置文件: {}", path.display());
        tracing::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<FileConfig> {
        let config = self.parse_toml(content)?;
        tracing::debug!("成功解析配置字符串");
        Ok(config)
    }
}

/// 环境变量配置加载器
///
/// 读取 `TARGET_URL`、`PHONE_NUM`、`EXPECTED_RESPONSE_CODE`，空字符串视为未设置
#[derive(Debug, Clone, Default)]
pub struct EnvConfigLoader;

impl EnvConfigLoader {
    /// 从当前进程环境读取覆盖项
    pub fn load(&self) -> ConfigOverrides {
        ConfigOverrides {
            target_url: read_env(TARGET_URL_ENV),
            phone_number: read_env(PHONE_NUM_ENV),
            expected_status: read_env(EXPECTED_RESPONSE_CODE_ENV),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
