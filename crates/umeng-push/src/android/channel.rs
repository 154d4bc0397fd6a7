//! 厂商系统通道
//!
//! 设置后消息经由小米系统通道下发，点击通知打开指定 activity。
//! 这些字段合并到请求文档的顶层，而不是 payload 内部。

use serde_json::{Map, Value};

use crate::common::ensure_present;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidSystemChannel {
    activity: String,
}

impl AndroidSystemChannel {
    pub fn new(activity: impl Into<String>) -> Result<Self> {
        let activity = activity.into();
        ensure_present("mi_activity", &activity)?;
        Ok(Self { activity })
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    /// 需要合并到请求顶层的字段
    pub fn to_dto(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("mipush".into(), Value::Bool(true));
        fields.insert("mi_activity".into(), Value::from(self.activity.as_str()));
        fields
    }
}
