//! 推送客户端配置
//!
//! 每个平台一组不可变的 (appkey, secret, production_mode)，在构造客户端时传入。

use std::fmt;
use std::time::Duration;

use umeng_shared::config::{AppConfig, CredentialSettings, DEFAULT_GATEWAY_URL};

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 默认连接池并发上限
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

/// 单个平台的推送凭证
#[derive(Clone, PartialEq, Eq)]
pub struct PushConfig {
    key: String,
    secret: String,
    production_mode: bool,
}

impl PushConfig {
    pub fn new(key: impl Into<String>, secret: impl Into<String>, production_mode: bool) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            production_mode,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn production_mode(&self) -> bool {
        self.production_mode
    }
}

// secret 不得出现在日志中
impl fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushConfig")
            .field("key", &self.key)
            .field("secret", &"***")
            .field("production_mode", &self.production_mode)
            .finish()
    }
}

impl From<&CredentialSettings> for PushConfig {
    fn from(settings: &CredentialSettings) -> Self {
        Self::new(&settings.key, &settings.secret, settings.production_mode)
    }
}

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub android: Option<PushConfig>,
    pub ios: Option<PushConfig>,
    /// 单次请求的超时时间
    pub timeout: Duration,
    /// 网关地址，默认为友盟官方地址
    pub gateway: String,
    /// 连接池允许的最大并发请求数
    pub max_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            android: None,
            ios: None,
            timeout: DEFAULT_TIMEOUT,
            gateway: DEFAULT_GATEWAY_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ClientConfig {
    /// 从应用配置转换
    pub fn from_settings(settings: &AppConfig) -> Self {
        Self {
            android: settings.android.as_ref().map(PushConfig::from),
            ios: settings.ios.as_ref().map(PushConfig::from),
            timeout: settings.gateway_timeout(),
            gateway: settings.gateway.url.clone(),
            max_connections: settings.gateway.max_connections,
        }
    }

    pub fn with_android(mut self, config: PushConfig) -> Self {
        self.android = Some(config);
        self
    }

    pub fn with_ios(mut self, config: PushConfig) -> Self {
        self.ios = Some(config);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }
}
