//! 推送指标模块
//!
//! 基于 metrics crate 门面记录推送请求的次数和耗时。
//! 未安装 recorder 时所有记录函数均为空操作。

/// 推送请求总数
pub const PUSH_REQUESTS_TOTAL: &str = "umeng_push_requests_total";

/// 推送请求耗时
pub const PUSH_REQUEST_DURATION_SECONDS: &str = "umeng_push_request_duration_seconds";

/// 注册推送指标的描述信息
pub fn describe_push_metrics() {
    metrics::describe_counter!(PUSH_REQUESTS_TOTAL, "Total number of UMeng push requests");
    metrics::describe_histogram!(
        PUSH_REQUEST_DURATION_SECONDS,
        "UMeng push request duration in seconds"
    );
}

/// 记录一次推送请求
///
/// outcome 取值：success / timeout / failed
#[inline]
pub fn record_push_request(platform: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        PUSH_REQUESTS_TOTAL,
        "platform" => platform.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        PUSH_REQUEST_DURATION_SECONDS,
        "platform" => platform.to_string()
    )
    .record(duration_secs);
}
