//! iOS 投递策略

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::{ensure_time_window, format_gateway_time, non_empty};
use crate::error::Result;

/// 已校验的 iOS 投递策略
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IosPushPolicy {
    start_time: Option<DateTime<Utc>>,
    expire_time: Option<DateTime<Utc>>,
    out_biz_no: Option<String>,
    apns_collapse_id: Option<String>,
}

impl IosPushPolicy {
    pub fn builder() -> IosPushPolicyBuilder {
        IosPushPolicyBuilder::default()
    }

    pub fn apns_collapse_id(&self) -> Option<&str> {
        self.apns_collapse_id.as_deref()
    }

    pub fn to_dto(&self) -> Value {
        let mut policy = Map::new();
        if let Some(start_time) = &self.start_time {
            policy.insert("start_time".into(), format_gateway_time(start_time).into());
        }
        if let Some(expire_time) = &self.expire_time {
            policy.insert("expire_time".into(), format_gateway_time(expire_time).into());
        }
        if let Some(out_biz_no) = &self.out_biz_no {
            policy.insert("out_biz_no".into(), out_biz_no.as_str().into());
        }
        if let Some(collapse_id) = &self.apns_collapse_id {
            policy.insert("apns_collapse_id".into(), collapse_id.as_str().into());
        }
        Value::Object(policy)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IosPushPolicyBuilder {
    start_time: Option<DateTime<Utc>>,
    expire_time: Option<DateTime<Utc>>,
    out_biz_no: Option<String>,
    apns_collapse_id: Option<String>,
}

impl IosPushPolicyBuilder {
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn expire_time(mut self, expire_time: DateTime<Utc>) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    pub fn out_biz_no(mut self, out_biz_no: impl Into<String>) -> Self {
        self.out_biz_no = Some(out_biz_no.into());
        self
    }

    /// 相同 collapse id 的未送达通知会被新通知替换
    pub fn apns_collapse_id(mut self, collapse_id: impl Into<String>) -> Self {
        self.apns_collapse_id = Some(collapse_id.into());
        self
    }

    pub fn build(self) -> Result<IosPushPolicy> {
        ensure_time_window(self.start_time, self.expire_time)?;

        Ok(IosPushPolicy {
            start_time: self.start_time,
            expire_time: self.expire_time,
            out_biz_no: non_empty(self.out_biz_no),
            apns_collapse_id: non_empty(self.apns_collapse_id),
        })
    }
}
