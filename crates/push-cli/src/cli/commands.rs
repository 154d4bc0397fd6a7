//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构，每个平台一个子命令。

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// 友盟推送命令行工具
///
/// 向单个设备发送一条通知，或使用 `--dry-run` 只打印签名后的请求。
#[derive(Parser, Debug)]
#[command(name = "umeng-push")]
#[command(version, about = "友盟推送命令行工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件中的设置
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// 运行环境，决定加载 config/{env}.toml，默认读取 UMENG_ENV
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// 配置文件目录
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 发送 Android 单播通知
    Android(AndroidArgs),

    /// 发送 iOS 单播通知
    Ios(IosArgs),
}

/// Android 子命令参数
///
/// `--url` / `--activity` / `--custom` 互斥，分别对应点击后的三种跳转方式；
/// 都不提供时点击打开应用。
#[derive(Args, Debug, Clone)]
pub struct AndroidArgs {
    /// 设备 token
    pub device_token: String,

    /// 通知栏提示文字
    #[arg(long)]
    pub ticker: String,

    /// 通知标题
    #[arg(long)]
    pub title: String,

    /// 通知内容
    #[arg(long)]
    pub text: String,

    /// 点击后打开的网页地址
    #[arg(long, conflicts_with_all = ["activity", "custom"])]
    pub url: Option<String>,

    /// 点击后打开的 activity
    #[arg(long, conflicts_with = "custom")]
    pub activity: Option<String>,

    /// 点击后交给应用处理的自定义内容（JSON 或纯文本）
    #[arg(long)]
    pub custom: Option<String>,

    /// 通知栏大图地址
    #[arg(long)]
    pub img: Option<String>,

    /// 状态栏图标，例如 R.drawable.ic_badge
    #[arg(long)]
    pub icon: Option<String>,

    /// 通知栏大图标，例如 R.drawable.ic_large
    #[arg(long)]
    pub large_icon: Option<String>,

    /// 自定义通知声音，例如 R.raw.chime
    #[arg(long)]
    pub sound: Option<String>,

    /// 自定义通知样式编号
    #[arg(long)]
    pub builder_id: Option<u32>,

    /// 收到通知时不震动
    #[arg(long)]
    pub no_vibrate: bool,

    /// 收到通知时不闪灯
    #[arg(long)]
    pub no_lights: bool,

    /// 收到通知时不发声
    #[arg(long)]
    pub no_sound: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// 每秒最大发送条数，不得小于 1000
    #[arg(long)]
    pub max_send_num: Option<u32>,

    /// 小米厂商通道的 activity，设置后走系统通道下发
    #[arg(long)]
    pub mi_activity: Option<String>,

    /// 推送描述
    #[arg(long, default_value = "umeng-push-cli")]
    pub description: String,

    /// 只打印签名后的请求，不发送
    #[arg(long)]
    pub dry_run: bool,
}

/// 两个平台共用的发送策略参数
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// 定时发送时间 (RFC 3339，例如 2025-01-01T08:00:00Z)
    #[arg(long)]
    pub start_time: Option<DateTime<Utc>>,

    /// 消息过期时间 (RFC 3339)
    #[arg(long)]
    pub expire_time: Option<DateTime<Utc>>,

    /// 业务号，网关按此去重
    #[arg(long)]
    pub out_biz_no: Option<String>,
}

impl PolicyArgs {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.expire_time.is_none() && self.out_biz_no.is_none()
    }
}

/// iOS 子命令参数
#[derive(Args, Debug, Clone)]
pub struct IosArgs {
    /// 设备 token
    pub device_token: String,

    /// 通知标题
    #[arg(long)]
    pub title: String,

    /// 通知副标题
    #[arg(long, default_value = "")]
    pub subtitle: String,

    /// 通知内容
    #[arg(long)]
    pub body: String,

    /// 角标数字
    #[arg(long, default_value = "1")]
    pub badge: u32,

    /// 声音文件名
    #[arg(long, default_value = "default")]
    pub sound: String,

    /// APNs collapse id
    #[arg(long)]
    pub collapse_id: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// 推送描述
    #[arg(long, default_value = "umeng-push-cli")]
    pub description: String,

    /// 只打印签名后的请求，不发送
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// 单元测试
// ============================================================================
