//! 构建器共用的校验与格式化函数

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::error::{PushError, Result};

/// 网关要求的时间格式（yyyy-MM-dd HH:mm:ss），统一按 UTC 输出
pub const GATEWAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static HTTP_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+\S*$").expect("HTTP URL 正则非法"));

/// 是否为绝对 http/https 地址
pub fn is_http_url(value: &str) -> bool {
    HTTP_URL_PATTERN.is_match(value)
}

/// 必填字段校验
pub(crate) fn ensure_present(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PushError::params(format!("{} 不能为空", field)));
    }
    Ok(())
}

/// 时间窗口校验：过期时间不得早于开始时间，两者相等是允许的
pub(crate) fn ensure_time_window(
    start_time: Option<DateTime<Utc>>,
    expire_time: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(start), Some(expire)) = (start_time, expire_time) {
        if expire < start {
            return Err(PushError::params(format!(
                "expire_time 不能早于 start_time: start_time={}, expire_time={}",
                format_gateway_time(&start),
                format_gateway_time(&expire)
            )));
        }
    }
    Ok(())
}

pub fn format_gateway_time(time: &DateTime<Utc>) -> String {
    time.format(GATEWAY_TIME_FORMAT).to_string()
}

/// 空字符串视为未设置
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// null、空字符串、空数组、空对象都视为未提供
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
