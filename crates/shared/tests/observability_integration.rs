//! 可观测性模块集成测试
//!
//! 测试指标记录和日志初始化的核心功能。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use umeng_shared::observability::metrics::{
        PUSH_REQUEST_DURATION_SECONDS, PUSH_REQUESTS_TOTAL, describe_push_metrics,
        record_push_request,
    };

    #[test]
    fn test_metric_names() {
        assert_eq!(PUSH_REQUESTS_TOTAL, "umeng_push_requests_total");
        assert_eq!(
            PUSH_REQUEST_DURATION_SECONDS,
            "umeng_push_request_duration_seconds"
        );
    }

    #[test]
    fn test_record_push_request() {
        describe_push_metrics();
        record_push_request("android", "success", 0.05);
        record_push_request("android", "failed", 0.12);
        record_push_request("ios", "success", 0.08);
        record_push_request("ios", "timeout", 30.0);
    }
}

// ============================================================================
// 日志初始化测试
// ============================================================================

mod tracing_tests {
    use umeng_shared::observability::{self, ObservabilityConfig};

    #[test]
    fn test_init_twice_returns_error() {
        let config = ObservabilityConfig::default()
            .with_service_name("observability-test")
            .with_log_level("debug");

        // 同一进程中只有第一次初始化会成功
        let first = observability::init(&config);
        let second = observability::init(&config);
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
