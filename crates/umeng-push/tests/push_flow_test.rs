//! 推送流程集成测试
//!
//! 使用桩传输层跑完整的 构建 → 组装 → 序列化 → 签名 → 分发 流程，无需访问真实网关。

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use umeng_push::sign::verify;
use umeng_push::test_utils::{
    FailingTransport, FixedClock, RecordingTransport, SequenceClock, SlowTransport, TEST_GATEWAY,
    sample_android_notification, sample_ios_notification, test_config,
};
use umeng_push::{
    AndroidPushNotification, AndroidPushPolicy, AndroidSystemChannel, ClientConfig, ErrorKind,
    HttpResponse, IosPushNotification, IosPushPolicy, Platform, PushConfig, PushError,
    ReqwestTransport, TransportError, UmengPushClient, UnicastRequest,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn recording_client(transport: Arc<RecordingTransport>) -> UmengPushClient {
    UmengPushClient::with_transport(test_config(), transport)
        .with_clock(Arc::new(FixedClock(1_700_000_000)))
}

fn sent_body(transport: &RecordingTransport) -> Value {
    let request = transport.last_request().expect("transport received a request");
    serde_json::from_slice(&request.body).expect("request body is JSON")
}

// ==================== Android ====================

mod android_flow {
    use super::*;

    #[tokio::test]
    async fn test_single_push_android() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        let notification = AndroidPushNotification::builder("新徽章", "恭喜获得徽章", "点击查看")
            .go_url("https://example.com/badges/1")
            .extra("badge_id", 1)
            .build()
            .unwrap();

        let result = client
            .single_push_android("android-token", notification, "徽章发放", None, None)
            .await
            .unwrap();
        assert_eq!(result["ret"], "SUCCESS");
        assert_eq!(transport.request_count(), 1);

        let body = sent_body(&transport);
        assert_eq!(body["appkey"], "android-key");
        assert_eq!(body["timestamp"], "1700000000");
        assert_eq!(body["type"], "unicast");
        assert_eq!(body["device_tokens"], "android-token");
        assert_eq!(body["production_mode"], false);
        assert_eq!(body["description"], "徽章发放");
        assert_eq!(body["payload"]["body"]["after_open"], "go_url");
        assert_eq!(body["payload"]["body"]["url"], "https://example.com/badges/1");
        assert_eq!(body["payload"]["extra"]["badge_id"], 1);
        assert!(body.get("policy").is_none());
    }

    #[tokio::test]
    async fn test_policy_and_system_channel_are_sent() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let policy = AndroidPushPolicy::builder()
            .start_time(start)
            .expire_time(start + chrono::Duration::hours(2))
            .max_send_num(1000)
            .out_biz_no("grant-42")
            .build()
            .unwrap();
        let channel = AndroidSystemChannel::new("com.example.push.MiActivity").unwrap();

        client
            .single_push_android(
                "android-token",
                sample_android_notification(),
                "desc",
                Some(policy),
                Some(channel),
            )
            .await
            .unwrap();

        let body = sent_body(&transport);
        assert_eq!(
            body["policy"],
            json!({
                "start_time": "2025-01-01 08:00:00",
                "expire_time": "2025-01-01 10:00:00",
                "max_send_num": 1000,
                "out_biz_no": "grant-42"
            })
        );
        assert_eq!(body["mipush"], true);
        assert_eq!(body["mi_activity"], "com.example.push.MiActivity");
    }

    #[tokio::test]
    async fn test_invalid_notification_never_reaches_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let _client = recording_client(transport.clone());

        let err = AndroidPushNotification::builder("t", "T", "text")
            .after_open(umeng_push::AfterOpen::GoUrl)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Params);
        assert!(err.to_string().contains("url"));
        assert_eq!(transport.request_count(), 0);
    }
}

// ==================== iOS ====================

mod ios_flow {
    use super::*;

    #[tokio::test]
    async fn test_single_push_ios() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        let notification = IosPushNotification::builder("恭喜", "连续签到", "点击查看")
            .badge(3)
            .extra("route", "/badges")
            .build()
            .unwrap();
        let policy = IosPushPolicy::builder()
            .apns_collapse_id("checkin")
            .build()
            .unwrap();

        client
            .single_push_ios("ios-token", notification, "签到提醒", Some(policy))
            .await
            .unwrap();

        let body = sent_body(&transport);
        assert_eq!(body["appkey"], "ios-key");
        assert_eq!(body["device_tokens"], "ios-token");
        assert_eq!(body["payload"]["aps"]["badge"], 3);
        assert_eq!(body["payload"]["aps"]["alert"]["subtitle"], "连续签到");
        assert_eq!(body["payload"]["route"], "/badges");
        assert_eq!(body["policy"], json!({"apns_collapse_id": "checkin"}));
    }

    #[tokio::test]
    async fn test_ios_without_config_is_config_missing() {
        let transport = Arc::new(RecordingTransport::new());
        let config = ClientConfig::default().with_android(PushConfig::new("k", "s", false));
        let client = UmengPushClient::with_transport(config, transport.clone());

        let err = client
            .single_push_ios("ios-token", sample_ios_notification(), "desc", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PushError::ConfigMissing {
                platform: Platform::Ios
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Push);
        assert_eq!(transport.request_count(), 0);
    }
}

// ==================== 网络请求 ====================

mod wire_format {
    use super::*;

    #[tokio::test]
    async fn test_request_is_signed_over_sent_bytes() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        client
            .single_push_android("android-token", sample_android_notification(), "desc", None, None)
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method.as_str(), "POST");
        assert_eq!(request.url, TEST_GATEWAY);
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            request.headers.get("connection").map(String::as_str),
            Some("keep-alive")
        );

        let sign = request.query.get("sign").unwrap();
        assert!(verify("POST", TEST_GATEWAY, &request.body, "android-secret", sign));
        assert!(!verify("POST", TEST_GATEWAY, &request.body, "ios-secret", sign));
    }

    #[tokio::test]
    async fn test_sent_bytes_match_prepared_bytes() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        let request =
            UnicastRequest::new("android-token", sample_android_notification(), "desc").unwrap();
        let prepared = client.prepare(&request).unwrap();
        client.send(&request).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.body, prepared.body().as_bytes());
        assert_eq!(sent.query.get("sign").map(String::as_str), Some(prepared.sign()));
    }

    #[tokio::test]
    async fn test_gateway_error_payload_is_returned_verbatim() {
        let transport = Arc::new(RecordingTransport::with_response(HttpResponse::new(
            400,
            r#"{"ret":"FAIL","data":{"error_code":"2003","error_msg":"签名不正确"}}"#,
        )));
        let client = recording_client(transport);

        let result = client
            .single_push_android("android-token", sample_android_notification(), "desc", None, None)
            .await
            .unwrap();
        assert_eq!(result["ret"], "FAIL");
        assert_eq!(result["data"]["error_code"], "2003");
    }
}

// ==================== 错误映射 ====================

mod error_mapping {
    use super::*;

    #[tokio::test]
    async fn test_slow_gateway_times_out() {
        let config = test_config().with_timeout(Duration::from_millis(50));
        let client = UmengPushClient::with_transport(
            config,
            Arc::new(SlowTransport::new(Duration::from_secs(2))),
        );

        let err = client
            .single_push_ios("ios-token", sample_ios_notification(), "desc", None)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(matches!(err, PushError::Timeout { timeout } if timeout == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_push_error() {
        let client = UmengPushClient::with_transport(
            test_config(),
            Arc::new(FailingTransport::new("connection refused")),
        );

        let err = client
            .single_push_android("android-token", sample_android_notification(), "desc", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Push);
        assert_eq!(err.code(), "TRANSPORT_ERROR");
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_non_json_response_is_decode_error() {
        let transport = Arc::new(RecordingTransport::with_response(HttpResponse::new(
            502,
            "<html>Bad Gateway</html>",
        )));
        let client = recording_client(transport);

        let err = client
            .single_push_android("android-token", sample_android_notification(), "desc", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Decode(_)));
        assert_eq!(err.kind(), ErrorKind::Push);
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_fail_closed() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        client.shutdown().await;
        client.shutdown().await;
        assert_eq!(transport.shutdown_count(), 1);

        let err = client
            .single_push_android("android-token", sample_android_notification(), "desc", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Transport(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_empty_device_token_is_params_error() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        let err = client
            .single_push_android("", sample_android_notification(), "desc", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Params);
        assert_eq!(transport.request_count(), 0);
    }
}

// ==================== 并发 ====================

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_are_isolated() {
        const CALLS: usize = 64;

        let transport = Arc::new(RecordingTransport::echo());
        let client = Arc::new(
            UmengPushClient::with_transport(test_config(), transport.clone())
                .with_clock(Arc::new(SequenceClock::starting_at(1_700_000_000))),
        );

        let tasks = (0..CALLS).map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let token = format!("device-{i}");
                let response = client
                    .single_push_android(&token, sample_android_notification(), "desc", None, None)
                    .await
                    .unwrap();
                (token, response)
            })
        });
        let results = futures::future::join_all(tasks).await;

        // echo 模式下响应体就是发送的请求体
        let mut timestamps = Vec::with_capacity(CALLS);
        for result in results {
            let (token, response) = result.unwrap();
            assert_eq!(response["device_tokens"], token.as_str());
            timestamps.push(response["timestamp"].as_str().unwrap().to_string());
        }
        timestamps.sort();
        timestamps.dedup();
        assert_eq!(timestamps.len(), CALLS);

        let requests = transport.requests();
        assert_eq!(requests.len(), CALLS);
        for request in requests {
            let sign = request.query.get("sign").unwrap();
            assert!(verify("POST", TEST_GATEWAY, &request.body, "android-secret", sign));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aborted_call_releases_connection_permit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/send"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ret": "SUCCESS"}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        // 只有一个并发名额，被取消的调用必须归还它
        let config = test_config()
            .with_gateway(format!("{}/api/send", server.uri()))
            .with_max_connections(1);
        let transport = ReqwestTransport::new(config.max_connections).unwrap();
        let client = Arc::new(UmengPushClient::with_transport(config, Arc::new(transport)));

        let first = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .single_push_android("device-a", sample_android_notification(), "a", None, None)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        let second = tokio::time::timeout(
            Duration::from_secs(3),
            client.single_push_android("device-b", sample_android_notification(), "b", None, None),
        )
        .await
        .expect("second call must not wait on the aborted call");
        assert_eq!(second.unwrap()["ret"], "SUCCESS");

        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_dropping_client_releases_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());
        assert_eq!(Arc::strong_count(&transport), 2);

        client
            .single_push_android("device-1", sample_android_notification(), "desc", None, None)
            .await
            .unwrap();
        drop(client);

        // 客户端持有的传输层引用随所有权一起释放，且不会触发额外请求或 shutdown
        assert_eq!(Arc::strong_count(&transport), 1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.shutdown_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_client_sends_nothing_to_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ret": "SUCCESS"})))
            .expect(0)
            .mount(&server)
            .await;

        let config = test_config().with_gateway(format!("{}/api/send", server.uri()));
        let transport = ReqwestTransport::new(config.max_connections).unwrap();
        let client = UmengPushClient::with_transport(config, Arc::new(transport));
        drop(client);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
