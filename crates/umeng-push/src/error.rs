//! 推送客户端错误类型
//!
//! 对外只暴露三类错误：
//! - **参数错误**：调用方数据不满足校验规则，构建时同步返回，不会触发网络请求
//! - **推送错误**：配置缺失、传输失败、响应解析失败等，携带底层原因
//! - **超时错误**：等待网关响应超过配置的超时时间，调用方可据此自行决定是否重试

use std::time::Duration;

use thiserror::Error;

use crate::transport::TransportError;
use crate::types::Platform;

/// 错误大类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Params,
    Push,
    Timeout,
}

/// 推送客户端错误
#[derive(Debug, Error)]
pub enum PushError {
    #[error("参数校验失败: {0}")]
    Params(String),

    #[error("推送配置未设置: platform={platform}")]
    ConfigMissing { platform: Platform },

    #[error("请求体序列化失败: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("推送网关请求失败: {0}")]
    Transport(#[source] TransportError),

    #[error("推送网关响应解析失败: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("连接推送网关超时: timeout={timeout:?}")]
    Timeout { timeout: Duration },
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, PushError>;

impl PushError {
    pub fn params(message: impl Into<String>) -> Self {
        Self::Params(message.into())
    }

    /// 错误大类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Params(_) => ErrorKind::Params,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ConfigMissing { .. }
            | Self::Serialization(_)
            | Self::Transport(_)
            | Self::Decode(_) => ErrorKind::Push,
        }
    }

    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Params(_) => "PARAMS_ERROR",
            Self::ConfigMissing { .. } => "CONFIG_MISSING",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl From<TransportError> for PushError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(timeout) => Self::Timeout { timeout },
            other => Self::Transport(other),
        }
    }
}
