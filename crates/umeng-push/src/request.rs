//! 请求组装
//!
//! 把平台凭证、时间戳、推送类型、设备 token、payload、策略和描述合并成一份请求文档。
//! 每个调用独立组装，文档只在单次调用内存在。

use serde_json::{Map, Value};
use tracing::debug;

use crate::android::{AndroidPushNotification, AndroidPushPolicy, AndroidSystemChannel};
use crate::canonical::{CanonicalBody, to_canonical_bytes};
use crate::common::ensure_present;
use crate::config::PushConfig;
use crate::error::Result;
use crate::ios::{IosPushNotification, IosPushPolicy};
use crate::types::{CastType, Platform};

/// 带平台标记的推送内容
#[derive(Debug, Clone, PartialEq)]
pub enum PushPayload {
    Android {
        notification: AndroidPushNotification,
        policy: Option<AndroidPushPolicy>,
        system_channel: Option<AndroidSystemChannel>,
    },
    Ios {
        notification: IosPushNotification,
        policy: Option<IosPushPolicy>,
    },
}

impl PushPayload {
    pub fn android(
        notification: AndroidPushNotification,
        policy: Option<AndroidPushPolicy>,
        system_channel: Option<AndroidSystemChannel>,
    ) -> Self {
        Self::Android {
            notification,
            policy,
            system_channel,
        }
    }

    pub fn ios(notification: IosPushNotification, policy: Option<IosPushPolicy>) -> Self {
        Self::Ios {
            notification,
            policy,
        }
    }

    /// 目标平台，客户端据此选择对应的凭证
    pub fn platform(&self) -> Platform {
        match self {
            Self::Android { .. } => Platform::Android,
            Self::Ios { .. } => Platform::Ios,
        }
    }

    fn payload_dto(&self) -> Value {
        match self {
            Self::Android { notification, .. } => notification.to_dto(),
            Self::Ios { notification, .. } => notification.to_dto(),
        }
    }

    fn policy_dto(&self) -> Option<Value> {
        match self {
            Self::Android { policy, .. } => policy.as_ref().map(AndroidPushPolicy::to_dto),
            Self::Ios { policy, .. } => policy.as_ref().map(IosPushPolicy::to_dto),
        }
    }

    fn top_level_fields(&self) -> Option<Map<String, Value>> {
        match self {
            Self::Android { system_channel, .. } => {
                system_channel.as_ref().map(AndroidSystemChannel::to_dto)
            }
            Self::Ios { .. } => None,
        }
    }
}

impl From<AndroidPushNotification> for PushPayload {
    fn from(notification: AndroidPushNotification) -> Self {
        Self::android(notification, None, None)
    }
}

impl From<IosPushNotification> for PushPayload {
    fn from(notification: IosPushNotification) -> Self {
        Self::ios(notification, None)
    }
}

/// 单播请求
#[derive(Debug, Clone, PartialEq)]
pub struct UnicastRequest {
    device_token: String,
    payload: PushPayload,
    description: String,
}

impl UnicastRequest {
    pub fn new(
        device_token: impl Into<String>,
        payload: impl Into<PushPayload>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let device_token = device_token.into();
        ensure_present("device_token", &device_token)?;

        Ok(Self {
            device_token,
            payload: payload.into(),
            description: description.into(),
        })
    }

    pub fn platform(&self) -> Platform {
        self.payload.platform()
    }

    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    pub fn payload(&self) -> &PushPayload {
        &self.payload
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// 请求文档
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDocument(Map<String, Value>);

impl RequestDocument {
    /// 组装请求文档
    ///
    /// 固定包含 appkey, timestamp, type, device_tokens, payload, production_mode,
    /// description；提供策略时附加 policy；厂商通道字段合并到顶层。
    pub fn assemble(config: &PushConfig, timestamp: &str, request: &UnicastRequest) -> Self {
        let mut document = Map::new();
        document.insert("appkey".into(), Value::from(config.key()));
        document.insert("timestamp".into(), Value::from(timestamp));
        document.insert("type".into(), Value::from(CastType::Unicast.as_str()));
        document.insert(
            "device_tokens".into(),
            Value::from(request.device_token.as_str()),
        );
        document.insert("payload".into(), request.payload.payload_dto());
        document.insert(
            "production_mode".into(),
            Value::Bool(config.production_mode()),
        );
        document.insert(
            "description".into(),
            Value::from(request.description.as_str()),
        );

        if let Some(policy) = request.payload.policy_dto() {
            document.insert("policy".into(), policy);
        }
        if let Some(fields) = request.payload.top_level_fields() {
            document.extend(fields);
        }

        debug!(
            platform = %request.platform(),
            device_token = %request.device_token,
            timestamp = timestamp,
            "推送请求已组装"
        );

        Self(document)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// 规范化序列化
    pub fn to_canonical(&self) -> Result<CanonicalBody> {
        to_canonical_bytes(&Value::Object(self.0.clone()))
    }
}
