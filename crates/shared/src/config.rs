//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::observability::ObservabilityConfig;

/// 友盟官方推送网关地址
pub const DEFAULT_GATEWAY_URL: &str = "https://msgapi.umeng.com/api/send";

/// 单个平台的应用凭证
///
/// 对应友盟后台为每个应用分配的 appkey / app master secret。
#[derive(Clone, Deserialize)]
pub struct CredentialSettings {
    pub key: String,
    pub secret: String,
    /// 是否为生产模式（false 时推送到测试设备）
    #[serde(default)]
    pub production_mode: bool,
}

// secret 不得出现在日志中
impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("key", &self.key)
            .field("secret", &"***")
            .field("production_mode", &self.production_mode)
            .finish()
    }
}

/// 推送网关配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub url: String,
    pub timeout_seconds: u64,
    /// 连接池允许的最大并发请求数
    pub max_connections: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_seconds: 30,
            max_connections: 1024,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: String,
    /// Android 凭证，未配置时 Android 推送不可用
    pub android: Option<CredentialSettings>,
    /// iOS 凭证，未配置时 iOS 推送不可用
    pub ios: Option<CredentialSettings>,
    pub gateway: GatewaySettings,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 环境变量（UMENG_ 前缀，层级用双下划线，如 UMENG_ANDROID__KEY -> android.key）
    ///
    /// 环境由 UMENG_ENV 指定，配置目录由 UMENG_CONFIG_DIR 指定。
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("UMENG_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir =
            std::env::var("UMENG_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    /// 从指定目录加载配置
    pub fn load_from(
        config_dir: &Path,
        env: &str,
        service_name: &str,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("environment", env)?
            .set_default("observability.service_name", service_name)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                Environment::with_prefix("UMENG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 网关请求超时
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.timeout_seconds)
    }
}
