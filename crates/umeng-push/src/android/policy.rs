//! Android 投递策略

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::{ensure_time_window, format_gateway_time, non_empty};
use crate::error::{PushError, Result};

/// 限速发送时每秒发送条数的下限
pub const MIN_MAX_SEND_NUM: u32 = 1000;

/// 已校验的 Android 投递策略
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AndroidPushPolicy {
    start_time: Option<DateTime<Utc>>,
    expire_time: Option<DateTime<Utc>>,
    max_send_num: Option<u32>,
    out_biz_no: Option<String>,
}

impl AndroidPushPolicy {
    pub fn builder() -> AndroidPushPolicyBuilder {
        AndroidPushPolicyBuilder::default()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.expire_time
    }

    pub fn max_send_num(&self) -> Option<u32> {
        self.max_send_num
    }

    pub fn out_biz_no(&self) -> Option<&str> {
        self.out_biz_no.as_deref()
    }

    /// 生成 policy 片段，时间按 UTC 格式化
    pub fn to_dto(&self) -> Value {
        let mut policy = Map::new();
        if let Some(start_time) = &self.start_time {
            policy.insert("start_time".into(), format_gateway_time(start_time).into());
        }
        if let Some(expire_time) = &self.expire_time {
            policy.insert("expire_time".into(), format_gateway_time(expire_time).into());
        }
        if let Some(max_send_num) = self.max_send_num {
            policy.insert("max_send_num".into(), max_send_num.into());
        }
        if let Some(out_biz_no) = &self.out_biz_no {
            policy.insert("out_biz_no".into(), out_biz_no.as_str().into());
        }
        Value::Object(policy)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AndroidPushPolicyBuilder {
    start_time: Option<DateTime<Utc>>,
    expire_time: Option<DateTime<Utc>>,
    max_send_num: Option<u32>,
    out_biz_no: Option<String>,
}

impl AndroidPushPolicyBuilder {
    /// 定时发送时间
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// 消息过期时间
    pub fn expire_time(mut self, expire_time: DateTime<Utc>) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    /// 每秒最大发送条数，不得小于 1000
    pub fn max_send_num(mut self, max_send_num: u32) -> Self {
        self.max_send_num = Some(max_send_num);
        self
    }

    /// 开发者业务号，网关按此去重
    pub fn out_biz_no(mut self, out_biz_no: impl Into<String>) -> Self {
        self.out_biz_no = Some(out_biz_no.into());
        self
    }

    pub fn build(self) -> Result<AndroidPushPolicy> {
        ensure_time_window(self.start_time, self.expire_time)?;

        if let Some(max_send_num) = self.max_send_num {
            if max_send_num < MIN_MAX_SEND_NUM {
                return Err(PushError::params(format!(
                    "max_send_num 不能小于 {}: {}",
                    MIN_MAX_SEND_NUM, max_send_num
                )));
            }
        }

        Ok(AndroidPushPolicy {
            start_time: self.start_time,
            expire_time: self.expire_time,
            max_send_num: self.max_send_num,
            out_biz_no: non_empty(self.out_biz_no),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 18, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_max_send_num_boundary() {
        let err = AndroidPushPolicy::builder()
            .max_send_num(999)
            .build()
            .unwrap_err();
        assert!(matches!(err, PushError::Params(_)));
        assert!(err.to_string().contains("max_send_num"));

        let policy = AndroidPushPolicy::builder()
            .max_send_num(1000)
            .build()
            .unwrap();
        assert_eq!(policy.max_send_num(), Some(1000));
    }

    #[test]
    fn test_time_window_boundary() {
        assert!(
            AndroidPushPolicy::builder()
                .start_time(start())
                .expire_time(start())
                .build()
                .is_ok()
        );

        let err = AndroidPushPolicy::builder()
            .start_time(start())
            .expire_time(start() - Duration::seconds(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, PushError::Params(_)));
    }

    #[test]
    fn test_time_window_checked_before_send_num() {
        let err = AndroidPushPolicy::builder()
            .max_send_num(1)
            .start_time(start())
            .expire_time(start() - Duration::hours(1))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("expire_time"));
    }

    #[test]
    fn test_to_dto() {
        let policy = AndroidPushPolicy::builder()
            .start_time(start())
            .expire_time(start() + Duration::days(1))
            .max_send_num(2000)
            .out_biz_no("biz-20240618-001")
            .build()
            .unwrap();

        assert_eq!(
            policy.to_dto(),
            json!({
                "start_time": "2024-06-18 20:00:00",
                "expire_time": "2024-06-19 20:00:00",
                "max_send_num": 2000,
                "out_biz_no": "biz-20240618-001"
            })
        );
    }

    #[test]
    fn test_empty_policy_dto() {
        let policy = AndroidPushPolicy::builder().out_biz_no("").build().unwrap();
        assert_eq!(policy.to_dto(), json!({}));
    }
}
