//! 请求签名
//!
//! 签名算法由网关规定：`md5(method + url + body + app_master_secret)` 的小写十六进制，
//! 以 `sign` 查询参数附加到请求地址上。这里只为满足网关协议，不承担安全用途。

use md5::{Digest, Md5};

use crate::canonical::CanonicalBody;
use crate::transport::Method;
use crate::types::Platform;

/// 签名查询参数名
pub const SIGN_QUERY_PARAM: &str = "sign";

/// 计算签名
pub fn sign(method: &str, url: &str, body: &[u8], secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(body);
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// 校验签名
pub fn verify(method: &str, url: &str, body: &[u8], secret: &str, signature: &str) -> bool {
    sign(method, url, body, secret).eq_ignore_ascii_case(signature)
}

/// 已签名、待发送的请求
///
/// 签名与请求体绑定在一起，发送时直接使用这份字节。
#[derive(Debug, Clone)]
pub struct SignedRequest {
    platform: Platform,
    method: Method,
    url: String,
    body: CanonicalBody,
    sign: String,
}

impl SignedRequest {
    pub fn new(
        platform: Platform,
        method: Method,
        url: impl Into<String>,
        body: CanonicalBody,
        secret: &str,
    ) -> Self {
        let url = url.into();
        let sign = sign(method.as_str(), &url, body.as_bytes(), secret);
        Self {
            platform,
            method,
            url,
            body,
            sign,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &CanonicalBody {
        &self.body
    }

    pub fn sign(&self) -> &str {
        &self.sign
    }

    pub(crate) fn into_parts(self) -> (Method, String, CanonicalBody, String) {
        (self.method, self.url, self.body, self.sign)
    }
}
