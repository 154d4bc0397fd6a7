//! 请求分发器
//!
//! 把已签名的请求发送到推送网关并映射结果。每次调用只发送一次，不做任何重试：
//!
//! ```text
//! Idle → Sending → Succeeded | TimedOut | Failed
//! ```
//!
//! 成功时响应体解析为 JSON 原样返回，不根据 HTTP 状态码分支；
//! 网关的业务错误码由调用方自行判断。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{error, info, warn};
use umeng_shared::observability::metrics::record_push_request;

use crate::error::{PushError, Result};
use crate::sign::{SIGN_QUERY_PARAM, SignedRequest};
use crate::transport::{HttpRequest, HttpTransport};

/// 单次分发的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Sending,
    Succeeded,
    TimedOut,
    Failed,
}

impl DispatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::Succeeded => "success",
            Self::TimedOut => "timeout",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::TimedOut | Self::Failed)
    }

    fn from_result(result: &Result<Value>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(e) if e.is_timeout() => Self::TimedOut,
            Err(_) => Self::Failed,
        }
    }
}

/// 推送网关分发器
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 发送已签名的请求
    pub async fn dispatch(&self, request: SignedRequest) -> Result<Value> {
        let platform = request.platform();
        let (method, url, body, sign) = request.into_parts();

        let mut query = BTreeMap::new();
        query.insert(SIGN_QUERY_PARAM.to_string(), sign);

        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("connection".to_string(), "keep-alive".to_string());

        let http_request = HttpRequest {
            method,
            url,
            query,
            headers,
            body: body.into_bytes(),
            timeout: self.timeout,
        };

        let start = Instant::now();
        let result = self.send(http_request).await;

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        let state = DispatchState::from_result(&result);

        match &result {
            Ok(_) => {
                info!(platform = %platform, elapsed_ms = elapsed_ms, "推送请求成功");
            }
            Err(e) if e.is_timeout() => {
                warn!(
                    platform = %platform,
                    elapsed_ms = elapsed_ms,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "推送网关请求超时"
                );
            }
            Err(e) => {
                error!(
                    platform = %platform,
                    elapsed_ms = elapsed_ms,
                    code = e.code(),
                    error = ?e,
                    "推送请求失败: {}",
                    e
                );
            }
        }

        record_push_request(platform.as_str(), state.as_str(), elapsed.as_secs_f64());
        result
    }

    async fn send(&self, request: HttpRequest) -> Result<Value> {
        let response = match tokio::time::timeout(self.timeout, self.transport.request(request)).await {
            Ok(response) => response?,
            Err(_) => {
                return Err(PushError::Timeout {
                    timeout: self.timeout,
                });
            }
        };

        serde_json::from_slice(&response.body).map_err(PushError::Decode)
    }

    /// 关闭底层连接池
    pub async fn shutdown(&self) {
        self.transport.shutdown().await;
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
