//! Android 推送
//!
//! - **notification**: 通知栏消息的构建与校验
//! - **policy**: 定时发送、过期时间、限速等投递策略
//! - **channel**: 厂商系统通道（小米）覆盖

mod channel;
mod notification;
mod policy;

pub use channel::AndroidSystemChannel;
pub use notification::{AndroidPushNotification, AndroidPushNotificationBuilder};
pub use policy::{AndroidPushPolicy, AndroidPushPolicyBuilder, MIN_MAX_SEND_NUM};
