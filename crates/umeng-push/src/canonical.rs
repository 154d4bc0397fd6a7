//! 规范化序列化
//!
//! 网关对请求体原文计算签名，因此同一份逻辑内容必须产出完全相同的字节：
//! - 每一层对象的键按字典序（字节序）排列，与 Map 的内部实现无关
//! - 分隔符固定为 `,` 和 `:`，不含任何空白
//! - 非 ASCII 字符原样输出，只转义 JSON 强制要求转义的字符
//!
//! 产出的 [`CanonicalBody`] 先用于签名，再原样作为 HTTP 请求体发送，中间不会重新序列化。

use std::fmt;

use serde_json::Value;

use crate::error::{PushError, Result};

/// 规范化后的请求体
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalBody(Vec<u8>);

impl CanonicalBody {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 以字符串形式查看（序列化结果总是合法 UTF-8）
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for CanonicalBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CanonicalBody").field(&self.as_str()).finish()
    }
}

/// 将 JSON 值序列化为规范化字节
pub fn to_canonical_bytes(value: &Value) -> Result<CanonicalBody> {
    let mut out = Vec::with_capacity(256);
    write_value(&mut out, value).map_err(PushError::Serialization)?;
    Ok(CanonicalBody(out))
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> serde_json::Result<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_value(out, item)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        // 标量交给 serde_json，字符串转义规则与网关一致
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}
