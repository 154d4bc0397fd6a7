//! 推送枚举类型
//!
//! 网关协议中固定取值的字段：目标平台、推送类型、消息类型、点击后行为。

use std::fmt;
use std::str::FromStr;

use crate::error::PushError;

/// 目标平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 推送类型
///
/// 当前客户端只走单播路径，其余类型保留网关定义的取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    /// 单播
    Unicast,
    /// 列播，不超过 500 个 device_token
    Listcast,
    /// 文件播，device_token 通过文件批量上传
    Filecast,
    /// 广播
    Broadcast,
    /// 组播，按 filter 筛选用户群
    Groupcast,
    /// 按 alias 推送
    Customizedcast,
}

impl CastType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unicast => "unicast",
            Self::Listcast => "listcast",
            Self::Filecast => "filecast",
            Self::Broadcast => "broadcast",
            Self::Groupcast => "groupcast",
            Self::Customizedcast => "customizedcast",
        }
    }
}

/// Android 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    /// 通知栏消息
    Notification,
    /// 应用内透传消息
    Message,
}

impl DisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Message => "message",
        }
    }
}

/// 点击通知后的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterOpen {
    /// 打开应用
    #[default]
    GoApp,
    /// 跳转到 URL
    GoUrl,
    /// 打开指定 activity
    GoActivity,
    /// 用户自定义内容
    GoCustom,
}

impl AfterOpen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoApp => "go_app",
            Self::GoUrl => "go_url",
            Self::GoActivity => "go_activity",
            Self::GoCustom => "go_custom",
        }
    }
}

impl fmt::Display for AfterOpen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AfterOpen {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "go_app" => Ok(Self::GoApp),
            "go_url" => Ok(Self::GoUrl),
            "go_activity" => Ok(Self::GoActivity),
            "go_custom" => Ok(Self::GoCustom),
            other => Err(PushError::params(format!("未知的 after_open 取值: {}", other))),
        }
    }
}
