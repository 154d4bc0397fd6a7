//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `android` - 发送 Android 单播通知
//! - `ios` - 发送 iOS 单播通知
//!
//! # 使用示例
//!
//! ```bash
//! # 发送 Android 通知，点击跳转网页
//! umeng-push android <device_token> --ticker 新消息 --title 标题 --text 正文 \
//!     --url https://example.com/detail
//!
//! # 定时发送并走小米系统通道
//! umeng-push android <device_token> --ticker 新消息 --title 标题 --text 正文 \
//!     --start-time 2025-01-01T08:00:00Z --out-biz-no grant-42 \
//!     --mi-activity com.example.push.MiActivity --dry-run
//!
//! # 只打印签名后的 iOS 请求
//! umeng-push ios <device_token> --title 标题 --body 正文 --badge 3 --dry-run
//! ```

pub mod commands;
pub mod runner;

pub use commands::{AndroidArgs, Cli, Commands, IosArgs, PolicyArgs};
pub use runner::CommandRunner;
