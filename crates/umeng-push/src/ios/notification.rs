//! iOS 通知

use serde_json::{Map, Value};

use crate::error::{PushError, Result};

/// payload 中保留给 APNs 的键
const APS_KEY: &str = "aps";

const DEFAULT_BADGE: u32 = 1;
const DEFAULT_SOUND: &str = "default";

/// 已校验的 iOS 通知
#[derive(Debug, Clone, PartialEq)]
pub struct IosPushNotification {
    title: String,
    subtitle: String,
    body: String,
    badge: u32,
    sound: String,
    extra: Map<String, Value>,
}

impl IosPushNotification {
    pub fn builder(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> IosPushNotificationBuilder {
        IosPushNotificationBuilder {
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
            badge: DEFAULT_BADGE,
            sound: DEFAULT_SOUND.to_string(),
            extra: Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn badge(&self) -> u32 {
        self.badge
    }

    pub fn sound(&self) -> &str {
        &self.sound
    }

    /// 生成 payload 片段
    ///
    /// extra 与 aps 平级合并，不嵌套在 extra 键下。
    pub fn to_dto(&self) -> Value {
        let mut alert = Map::new();
        alert.insert("title".into(), Value::from(self.title.as_str()));
        alert.insert("subtitle".into(), Value::from(self.subtitle.as_str()));
        alert.insert("body".into(), Value::from(self.body.as_str()));

        let mut aps = Map::new();
        aps.insert("alert".into(), Value::Object(alert));
        aps.insert("badge".into(), Value::from(self.badge));
        aps.insert("sound".into(), Value::from(self.sound.as_str()));

        let mut payload = Map::new();
        payload.insert(APS_KEY.into(), Value::Object(aps));
        for (key, value) in &self.extra {
            payload.insert(key.clone(), value.clone());
        }
        Value::Object(payload)
    }
}

#[derive(Debug, Clone)]
pub struct IosPushNotificationBuilder {
    title: String,
    subtitle: String,
    body: String,
    badge: u32,
    sound: String,
    extra: Map<String, Value>,
}

impl IosPushNotificationBuilder {
    /// 角标数字，默认 1
    pub fn badge(mut self, badge: u32) -> Self {
        self.badge = badge;
        self
    }

    /// 声音文件名，默认 "default"
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = sound.into();
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn extras(mut self, extra: Map<String, Value>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// 构建通知，extra 中不允许出现 aps 键
    pub fn build(self) -> Result<IosPushNotification> {
        if self.extra.contains_key(APS_KEY) {
            return Err(PushError::params("extra 不能包含保留键 aps"));
        }

        Ok(IosPushNotification {
            title: self.title,
            subtitle: self.subtitle,
            body: self.body,
            badge: self.badge,
            sound: self.sound,
            extra: self.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let notification = IosPushNotification::builder("标题", "副标题", "正文")
            .build()
            .unwrap();

        assert_eq!(
            notification.to_dto(),
            json!({
                "aps": {
                    "alert": {"title": "标题", "subtitle": "副标题", "body": "正文"},
                    "badge": 1,
                    "sound": "default"
                }
            })
        );
    }

    #[test]
    fn test_extra_is_merged_at_top_level() {
        let notification = IosPushNotification::builder("T", "S", "B")
            .badge(5)
            .sound("chime.caf")
            .extra("order_id", "A1001")
            .extra("silent", false)
            .build()
            .unwrap();

        let dto = notification.to_dto();
        assert_eq!(dto["order_id"], "A1001");
        assert_eq!(dto["silent"], json!(false));
        assert!(dto.get("extra").is_none());
        assert_eq!(dto["aps"]["badge"], 5);
        assert_eq!(dto["aps"]["sound"], "chime.caf");
    }

    #[test]
    fn test_aps_key_reserved() {
        let err = IosPushNotification::builder("T", "S", "B")
            .extra("aps", json!({"badge": 9}))
            .build()
            .unwrap_err();
        assert!(matches!(err, PushError::Params(_)));
        assert!(err.to_string().contains("aps"));
    }
}
