//! 测试工具模块
//!
//! 提供单元测试和集成测试共用的桩传输层、固定时钟和测试数据构造函数，
//! 让推送流程可以在不访问真实网关的情况下完整运行。

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::android::AndroidPushNotification;
use crate::client::Clock;
use crate::config::{ClientConfig, PushConfig};
use crate::ios::IosPushNotification;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

// ==================== 测试配置 ====================

/// 测试网关地址
pub const TEST_GATEWAY: &str = "https://msgapi.umeng.com/api/send";

/// 同时配置了两个平台的客户端配置
pub fn test_config() -> ClientConfig {
    ClientConfig::default()
        .with_android(PushConfig::new("android-key", "android-secret", false))
        .with_ios(PushConfig::new("ios-key", "ios-secret", false))
        .with_gateway(TEST_GATEWAY)
        .with_timeout(Duration::from_secs(5))
}

/// 最简 Android 通知
pub fn sample_android_notification() -> AndroidPushNotification {
    AndroidPushNotification::builder("新徽章", "恭喜获得徽章", "点击查看详情")
        .build()
        .expect("sample android notification is valid")
}

/// 最简 iOS 通知
pub fn sample_ios_notification() -> IosPushNotification {
    IosPushNotification::builder("恭喜获得徽章", "连续签到 7 天", "点击查看详情")
        .build()
        .expect("sample ios notification is valid")
}

// ==================== 时钟 ====================

/// 固定时间戳
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> i64 {
        self.0
    }
}

/// 每次调用递增一秒的时钟
#[derive(Debug)]
pub struct SequenceClock {
    next: AtomicI64,
}

impl SequenceClock {
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Clock for SequenceClock {
    fn unix_timestamp(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

// ==================== 桩传输层 ====================

#[derive(Debug, Clone)]
enum ResponseMode {
    Canned(HttpResponse),
    Echo,
}

/// 记录所有请求的桩传输层
///
/// 默认返回 `{"ret":"SUCCESS"}`；`echo()` 模式下把请求体原样作为响应体返回。
/// 关闭之后的请求返回 `TransportError::Closed`，与真实连接池一致。
#[derive(Debug)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    mode: ResponseMode,
    shutdowns: AtomicUsize,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_response(HttpResponse::new(
            200,
            r#"{"ret":"SUCCESS","data":{"msg_id":"test-msg-id"}}"#,
        ))
    }

    pub fn with_response(response: HttpResponse) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            mode: ResponseMode::Canned(response),
            shutdowns: AtomicUsize::new(0),
        }
    }

    pub fn echo() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            mode: ResponseMode::Echo,
            shutdowns: AtomicUsize::new(0),
        }
    }

    /// 已记录的请求
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.shutdown_count() > 0 {
            return Err(TransportError::Closed);
        }

        let response = match &self.mode {
            ResponseMode::Canned(response) => response.clone(),
            ResponseMode::Echo => HttpResponse::new(200, request.body.clone()),
        };
        self.requests.lock().push(request);
        Ok(response)
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// 响应前先等待一段时间的桩传输层，用于触发超时
#[derive(Debug)]
pub struct SlowTransport {
    delay: Duration,
}

impl SlowTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl HttpTransport for SlowTransport {
    async fn request(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(HttpResponse::new(200, r#"{"ret":"SUCCESS"}"#))
    }

    async fn shutdown(&self) {}
}

/// 总是失败的桩传输层
#[derive(Debug)]
pub struct FailingTransport {
    message: String,
}

impl FailingTransport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl HttpTransport for FailingTransport {
    async fn request(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Connection(self.message.clone()))
    }

    async fn shutdown(&self) {}
}
