//! 友盟推送客户端
//!
//! 将类型化的通知描述转换为逐字节确定的签名请求，发送到友盟推送网关，
//! 并把传输结果映射为三类错误：参数错误、推送错误、超时错误。
//!
//! ## 处理流程
//!
//! 通知构建器 → 请求组装 → 规范化序列化 → 签名 → 分发。
//! 分发之前的所有步骤都是同步、纯 CPU 的，只有分发器会执行网络 I/O。
//!
//! ## 使用示例
//!
//! ```ignore
//! use umeng_push::{AndroidPushNotification, ClientConfig, PushConfig, UmengPushClient};
//!
//! let config = ClientConfig::default()
//!     .with_android(PushConfig::new("appkey", "master-secret", true));
//! let client = UmengPushClient::new(config)?;
//!
//! let notification = AndroidPushNotification::builder("新消息", "标题", "正文")
//!     .go_url("https://example.com/detail")
//!     .build()?;
//! let result = client
//!     .single_push_android("device-token", notification, "运营推送", None, None)
//!     .await?;
//!
//! client.shutdown().await;
//! ```

pub mod android;
pub mod canonical;
pub mod client;
pub mod common;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ios;
pub mod request;
pub mod sign;
pub mod test_utils;
pub mod transport;
pub mod types;

pub use android::{AndroidPushNotification, AndroidPushPolicy, AndroidSystemChannel};
pub use canonical::CanonicalBody;
pub use client::{Clock, PlatformChannel, SystemClock, UmengPushClient};
pub use config::{ClientConfig, PushConfig};
pub use dispatcher::{DispatchState, Dispatcher};
pub use error::{ErrorKind, PushError, Result};
pub use ios::{IosPushNotification, IosPushPolicy};
pub use request::{PushPayload, RequestDocument, UnicastRequest};
pub use sign::SignedRequest;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{AfterOpen, CastType, DisplayType, Platform};
