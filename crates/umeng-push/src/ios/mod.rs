//! iOS 推送
//!
//! payload 遵循 APNs 的 aps 结构，附加数据平铺在 payload 顶层。

mod notification;
mod policy;

pub use notification::{IosPushNotification, IosPushNotificationBuilder};
pub use policy::{IosPushPolicy, IosPushPolicyBuilder};
