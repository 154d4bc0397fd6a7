//! 推送客户端
//!
//! 客户端为每个已配置的平台持有一个 [`PlatformChannel`]，请求按自身携带的平台标记
//! 选择通道。客户端是 `Send + Sync` 的，可以放在 `Arc` 中被任意多个任务并发使用；
//! 单次调用的状态全部在调用自身的栈上，共享的只有只读配置和传输层。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use crate::android::{AndroidPushNotification, AndroidPushPolicy, AndroidSystemChannel};
use crate::config::{ClientConfig, PushConfig};
use crate::dispatcher::Dispatcher;
use crate::error::{PushError, Result};
use crate::ios::{IosPushNotification, IosPushPolicy};
use crate::request::{PushPayload, RequestDocument, UnicastRequest};
use crate::sign::SignedRequest;
use crate::transport::{HttpTransport, Method, ReqwestTransport};
use crate::types::Platform;

/// 时间戳来源
pub trait Clock: Send + Sync {
    /// 当前 Unix 时间戳（秒）
    fn unix_timestamp(&self) -> i64;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// 单个平台的推送通道
///
/// 负责组装、序列化并签名该平台的请求。
#[derive(Debug, Clone)]
pub struct PlatformChannel {
    platform: Platform,
    config: PushConfig,
}

impl PlatformChannel {
    pub fn new(platform: Platform, config: PushConfig) -> Self {
        Self { platform, config }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// 组装、规范化并签名一个请求
    pub fn prepare(
        &self,
        request: &UnicastRequest,
        timestamp: &str,
        gateway: &str,
    ) -> Result<SignedRequest> {
        if request.platform() != self.platform {
            return Err(PushError::params(format!(
                "请求平台 {} 与通道平台 {} 不一致",
                request.platform(),
                self.platform
            )));
        }

        let document = RequestDocument::assemble(&self.config, timestamp, request);
        let body = document.to_canonical()?;
        Ok(SignedRequest::new(
            self.platform,
            Method::POST,
            gateway,
            body,
            self.config.secret(),
        ))
    }
}

/// 友盟推送客户端
pub struct UmengPushClient {
    android: Option<PlatformChannel>,
    ios: Option<PlatformChannel>,
    gateway: String,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    shutdown: AtomicBool,
}

impl UmengPushClient {
    /// 使用默认的 reqwest 连接池创建客户端
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.max_connections)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// 使用指定的传输层创建客户端
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let android = config
            .android
            .map(|c| PlatformChannel::new(Platform::Android, c));
        let ios = config.ios.map(|c| PlatformChannel::new(Platform::Ios, c));

        info!(
            android = android.is_some(),
            ios = ios.is_some(),
            gateway = %config.gateway,
            timeout_ms = config.timeout.as_millis() as u64,
            "推送客户端已创建"
        );

        Self {
            android,
            ios,
            gateway: config.gateway,
            dispatcher: Dispatcher::new(transport, config.timeout),
            clock: Arc::new(SystemClock),
            shutdown: AtomicBool::new(false),
        }
    }

    /// 替换时间戳来源
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn timeout(&self) -> Duration {
        self.dispatcher.timeout()
    }

    /// 获取平台通道，平台未配置时返回 `ConfigMissing`
    pub fn channel(&self, platform: Platform) -> Result<&PlatformChannel> {
        let channel = match platform {
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        };
        channel.ok_or(PushError::ConfigMissing { platform })
    }

    /// 生成已签名的请求，不发送
    pub fn prepare(&self, request: &UnicastRequest) -> Result<SignedRequest> {
        let channel = self.channel(request.platform())?;
        let timestamp = self.clock.unix_timestamp().to_string();
        channel.prepare(request, &timestamp, &self.gateway)
    }

    /// 发送单播请求
    #[instrument(
        skip(self, request),
        fields(platform = %request.platform(), device_token = %request.device_token())
    )]
    pub async fn send(&self, request: &UnicastRequest) -> Result<Value> {
        let signed = self.prepare(request)?;
        self.dispatcher.dispatch(signed).await
    }

    /// Android 单播
    pub async fn single_push_android(
        &self,
        device_token: &str,
        notification: AndroidPushNotification,
        description: &str,
        policy: Option<AndroidPushPolicy>,
        system_channel: Option<AndroidSystemChannel>,
    ) -> Result<Value> {
        let request = UnicastRequest::new(
            device_token,
            PushPayload::android(notification, policy, system_channel),
            description,
        )?;
        self.send(&request).await
    }

    /// iOS 单播
    pub async fn single_push_ios(
        &self,
        device_token: &str,
        notification: IosPushNotification,
        description: &str,
        policy: Option<IosPushPolicy>,
    ) -> Result<Value> {
        let request = UnicastRequest::new(
            device_token,
            PushPayload::ios(notification, policy),
            description,
        )?;
        self.send(&request).await
    }

    /// 释放连接池
    ///
    /// 只有第一次调用会真正释放，之后的调用直接返回。
    pub async fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        self.dispatcher.shutdown().await;
        info!("推送客户端已关闭");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for UmengPushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UmengPushClient")
            .field("android", &self.android)
            .field("ios", &self.ios)
            .field("gateway", &self.gateway)
            .field("dispatcher", &self.dispatcher)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::verify;
    use crate::test_utils::{FixedClock, RecordingTransport, sample_android_notification, test_config};

    fn client_with(transport: Arc<RecordingTransport>) -> UmengPushClient {
        UmengPushClient::with_transport(test_config(), transport)
            .with_clock(Arc::new(FixedClock(1_700_000_000)))
    }

    #[test]
    fn test_missing_platform_config() {
        let config = ClientConfig::default().with_android(PushConfig::new("k", "s", false));
        let client = UmengPushClient::with_transport(config, Arc::new(RecordingTransport::new()));

        assert!(client.channel(Platform::Android).is_ok());
        let err = client.channel(Platform::Ios).unwrap_err();
        assert!(matches!(
            err,
            PushError::ConfigMissing {
                platform: Platform::Ios
            }
        ));
    }

    #[test]
    fn test_prepare_signs_canonical_body() {
        let client = client_with(Arc::new(RecordingTransport::new()));
        let request =
            UnicastRequest::new("token-1", sample_android_notification(), "desc").unwrap();

        let signed = client.prepare(&request).unwrap();
        assert_eq!(signed.platform(), Platform::Android);
        assert_eq!(signed.method(), &Method::POST);
        assert_eq!(signed.url(), client.gateway());
        assert!(signed.body().as_str().contains(r#""timestamp":"1700000000""#));
        assert!(verify(
            "POST",
            signed.url(),
            signed.body().as_bytes(),
            "android-secret",
            signed.sign()
        ));
    }

    #[test]
    fn test_channel_rejects_other_platform() {
        let channel = PlatformChannel::new(Platform::Ios, PushConfig::new("k", "s", false));
        let request =
            UnicastRequest::new("token-1", sample_android_notification(), "desc").unwrap();
        let err = channel
            .prepare(&request, "1700000000", "https://msgapi.umeng.com/api/send")
            .unwrap_err();
        assert!(matches!(err, PushError::Params(_)));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let transport = Arc::new(RecordingTransport::new());
        let client = client_with(transport.clone());

        client.shutdown().await;
        client.shutdown().await;
        assert!(client.is_shutdown());
        assert_eq!(transport.shutdown_count(), 1);
    }
}
