//! Android 通知栏消息
//!
//! 通过 `AndroidPushNotification::builder` 构建，`build()` 时一次性完成全部校验，
//! 构建成功的对象不可变，后续不再重复校验。

use serde_json::{Map, Value};

use crate::common::{ensure_present, is_blank, is_http_url, non_empty};
use crate::error::{PushError, Result};
use crate::types::{AfterOpen, DisplayType};

/// 通知图标资源前缀
const DRAWABLE_PREFIX: &str = "R.drawable.";

/// 通知声音资源前缀
const RAW_PREFIX: &str = "R.raw.";

/// 已校验的 Android 通知
#[derive(Debug, Clone, PartialEq)]
pub struct AndroidPushNotification {
    ticker: String,
    title: String,
    text: String,
    icon: Option<String>,
    large_icon: Option<String>,
    img: Option<String>,
    sound: Option<String>,
    builder_id: Option<u32>,
    play_vibrate: bool,
    play_lights: bool,
    play_sound: bool,
    after_open: AfterOpen,
    url: Option<String>,
    activity: Option<String>,
    custom: Option<Value>,
    extra: Map<String, Value>,
}

impl AndroidPushNotification {
    /// 创建构建器，ticker / title / text 为必填项
    pub fn builder(
        ticker: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> AndroidPushNotificationBuilder {
        AndroidPushNotificationBuilder::new(ticker, title, text)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn after_open(&self) -> AfterOpen {
        self.after_open
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// 生成 payload 片段
    ///
    /// 三个 play_* 标志按网关要求输出为字符串 "true" / "false"，
    /// 未设置的可选字段不出现在结果中。
    pub fn to_dto(&self) -> Value {
        let mut body = Map::new();
        body.insert("ticker".into(), Value::from(self.ticker.as_str()));
        body.insert("title".into(), Value::from(self.title.as_str()));
        body.insert("text".into(), Value::from(self.text.as_str()));
        body.insert("play_vibrate".into(), flag(self.play_vibrate));
        body.insert("play_lights".into(), flag(self.play_lights));
        body.insert("play_sound".into(), flag(self.play_sound));
        body.insert("after_open".into(), Value::from(self.after_open.as_str()));

        insert_opt(&mut body, "icon", &self.icon);
        insert_opt(&mut body, "largeIcon", &self.large_icon);
        insert_opt(&mut body, "img", &self.img);
        insert_opt(&mut body, "sound", &self.sound);
        if let Some(builder_id) = self.builder_id {
            body.insert("builder_id".into(), Value::from(builder_id));
        }
        insert_opt(&mut body, "url", &self.url);
        insert_opt(&mut body, "activity", &self.activity);
        if let Some(custom) = &self.custom {
            body.insert("custom".into(), custom.clone());
        }

        let mut payload = Map::new();
        payload.insert(
            "display_type".into(),
            Value::from(DisplayType::Notification.as_str()),
        );
        payload.insert("body".into(), Value::Object(body));
        if !self.extra.is_empty() {
            payload.insert("extra".into(), Value::Object(self.extra.clone()));
        }
        Value::Object(payload)
    }
}

fn flag(value: bool) -> Value {
    Value::from(if value { "true" } else { "false" })
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::from(value.as_str()));
    }
}

/// Android 通知构建器
///
/// 可选字段可按任意顺序设置，结果与设置顺序无关。
#[derive(Debug, Clone)]
pub struct AndroidPushNotificationBuilder {
    ticker: String,
    title: String,
    text: String,
    icon: Option<String>,
    large_icon: Option<String>,
    img: Option<String>,
    sound: Option<String>,
    builder_id: Option<u32>,
    play_vibrate: bool,
    play_lights: bool,
    play_sound: bool,
    after_open: AfterOpen,
    url: Option<String>,
    activity: Option<String>,
    custom: Option<Value>,
    extra: Map<String, Value>,
}

impl AndroidPushNotificationBuilder {
    fn new(ticker: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            title: title.into(),
            text: text.into(),
            icon: None,
            large_icon: None,
            img: None,
            sound: None,
            builder_id: None,
            play_vibrate: true,
            play_lights: true,
            play_sound: true,
            after_open: AfterOpen::GoApp,
            url: None,
            activity: None,
            custom: None,
            extra: Map::new(),
        }
    }

    /// 状态栏图标，必须以 R.drawable. 开头
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// 通知栏大图标，必须以 R.drawable. 开头
    pub fn large_icon(mut self, large_icon: impl Into<String>) -> Self {
        self.large_icon = Some(large_icon.into());
        self
    }

    /// 通知栏大图，必须是 http/https 地址
    pub fn img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    /// 通知声音，必须以 R.raw. 开头
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// 自定义通知样式编号
    pub fn builder_id(mut self, builder_id: u32) -> Self {
        self.builder_id = Some(builder_id);
        self
    }

    pub fn play_vibrate(mut self, play_vibrate: bool) -> Self {
        self.play_vibrate = play_vibrate;
        self
    }

    pub fn play_lights(mut self, play_lights: bool) -> Self {
        self.play_lights = play_lights;
        self
    }

    pub fn play_sound(mut self, play_sound: bool) -> Self {
        self.play_sound = play_sound;
        self
    }

    pub fn after_open(mut self, after_open: AfterOpen) -> Self {
        self.after_open = after_open;
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn custom(mut self, custom: impl Into<Value>) -> Self {
        self.custom = Some(custom.into());
        self
    }

    /// 点击后跳转到 URL
    pub fn go_url(self, url: impl Into<String>) -> Self {
        self.after_open(AfterOpen::GoUrl).url(url)
    }

    /// 点击后打开指定 activity
    pub fn go_activity(self, activity: impl Into<String>) -> Self {
        self.after_open(AfterOpen::GoActivity).activity(activity)
    }

    /// 点击后由应用处理自定义内容
    pub fn go_custom(self, custom: impl Into<Value>) -> Self {
        self.after_open(AfterOpen::GoCustom).custom(custom)
    }

    /// 添加附加数据
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// 批量添加附加数据
    pub fn extras(mut self, extra: Map<String, Value>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// 校验并构建通知
    ///
    /// 校验顺序固定，返回第一个不满足的规则：
    /// 1. 必填字段（ticker, title, text）
    /// 2. 资源名前缀（icon, large_icon, sound）
    /// 3. 图片地址格式（img）
    /// 4. after_open 对应的伴随字段（url / activity / custom）
    pub fn build(self) -> Result<AndroidPushNotification> {
        ensure_present("ticker", &self.ticker)?;
        ensure_present("title", &self.title)?;
        ensure_present("text", &self.text)?;

        let icon = non_empty(self.icon);
        let large_icon = non_empty(self.large_icon);
        let img = non_empty(self.img);
        let sound = non_empty(self.sound);
        let url = non_empty(self.url);
        let activity = non_empty(self.activity);
        let custom = self.custom.filter(|c| !is_blank(c));

        ensure_prefix("icon", icon.as_deref(), DRAWABLE_PREFIX)?;
        ensure_prefix("large_icon", large_icon.as_deref(), DRAWABLE_PREFIX)?;
        ensure_prefix("sound", sound.as_deref(), RAW_PREFIX)?;

        if let Some(img) = img.as_deref() {
            if !is_http_url(img) {
                return Err(PushError::params(format!(
                    "img 必须是 http/https 地址: {}",
                    img
                )));
            }
        }

        match self.after_open {
            AfterOpen::GoApp => {}
            AfterOpen::GoUrl => {
                if !url.as_deref().is_some_and(is_http_url) {
                    return Err(PushError::params(
                        "after_open=go_url 时 url 必填且必须是 http/https 地址",
                    ));
                }
            }
            AfterOpen::GoActivity => {
                if activity.is_none() {
                    return Err(PushError::params("after_open=go_activity 时 activity 必填"));
                }
            }
            AfterOpen::GoCustom => {
                if custom.is_none() {
                    return Err(PushError::params("after_open=go_custom 时 custom 必填"));
                }
            }
        }

        Ok(AndroidPushNotification {
            ticker: self.ticker,
            title: self.title,
            text: self.text,
            icon,
            large_icon,
            img,
            sound,
            builder_id: self.builder_id,
            play_vibrate: self.play_vibrate,
            play_lights: self.play_lights,
            play_sound: self.play_sound,
            after_open: self.after_open,
            url,
            activity,
            custom,
            extra: self.extra,
        })
    }
}

fn ensure_prefix(field: &str, value: Option<&str>, prefix: &str) -> Result<()> {
    match value {
        Some(v) if !v.starts_with(prefix) => Err(PushError::params(format!(
            "{} 必须以 {} 开头: {}",
            field, prefix, v
        ))),
        _ => Ok(()),
    }
}
