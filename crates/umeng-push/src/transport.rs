//! HTTP 传输层
//!
//! 分发器只依赖 [`HttpTransport`] 这个接口，生产环境使用基于 reqwest 的
//! [`ReqwestTransport`]，测试中可以替换为 Mock 实现。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info};

pub use reqwest::Method;

/// 传输层请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

/// 传输层响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// 传输层错误
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("请求超时: {0:?}")]
    Timeout(Duration),

    #[error("HTTP 请求失败: {0}")]
    Http(#[source] reqwest::Error),

    #[error("连接失败: {0}")]
    Connection(String),

    #[error("连接池已关闭")]
    Closed,
}

/// HTTP 传输接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发送请求并读取完整响应体
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// 关闭连接池，重复调用无副作用
    async fn shutdown(&self);
}

/// 基于 reqwest 的传输实现
///
/// 连接池在构造时创建，由客户端独占；并发请求数由信号量限制。
pub struct ReqwestTransport {
    client: RwLock<Option<reqwest::Client>>,
    permits: Semaphore,
    closed: AtomicBool,
}

impl ReqwestTransport {
    pub fn new(max_connections: usize) -> Result<Self, TransportError> {
        let max_connections = max_connections.max(1);
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(max_connections)
            .build()
            .map_err(TransportError::Http)?;

        debug!(max_connections = max_connections, "HTTP 连接池已创建");

        Ok(Self {
            client: RwLock::new(Some(client)),
            permits: Semaphore::new(max_connections),
            closed: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn client(&self) -> Result<reqwest::Client, TransportError> {
        self.client.read().clone().ok_or(TransportError::Closed)
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("available_permits", &self.permits.available_permits())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::Closed)?;
        let client = self.client()?;

        let mut builder = client
            .request(request.method, &request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let timeout = request.timeout;
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else if e.is_connect() {
                TransportError::Connection(e.to_string())
            } else {
                TransportError::Http(e)
            }
        };

        let response = builder.send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_err)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }

    async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.permits.close();
        self.client.write().take();
        info!("HTTP 连接池已关闭");
    }
}
