//! 命令执行器
//!
//! 把命令行参数转换为推送请求，发送后打印网关响应。

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;
use umeng_push::{
    AndroidPushNotification, AndroidPushPolicy, AndroidSystemChannel, ClientConfig,
    IosPushNotification, IosPushPolicy, PushPayload, UmengPushClient, UnicastRequest,
};
use umeng_shared::config::AppConfig;

use super::commands::{AndroidArgs, IosArgs, PolicyArgs};

/// 命令执行器
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 执行 android 命令
    pub async fn run_android(&self, args: AndroidArgs) -> Result<()> {
        let dry_run = args.dry_run;
        let request = android_request(args)?;
        self.execute(request, dry_run).await
    }

    /// 执行 ios 命令
    pub async fn run_ios(&self, args: IosArgs) -> Result<()> {
        let dry_run = args.dry_run;
        let request = ios_request(args)?;
        self.execute(request, dry_run).await
    }

    async fn execute(&self, request: UnicastRequest, dry_run: bool) -> Result<()> {
        let client = UmengPushClient::new(ClientConfig::from_settings(&self.config))
            .context("创建推送客户端失败")?;

        let output = if dry_run {
            self.render_dry_run(&client, &request)
        } else {
            info!(
                platform = %request.platform(),
                device_token = %request.device_token(),
                "发送推送"
            );
            client
                .send(&request)
                .await
                .map_err(anyhow::Error::from)
                .and_then(|value| Ok(serde_json::to_string_pretty(&value)?))
        };

        client.shutdown().await;
        println!("{}", output?);
        Ok(())
    }

    fn render_dry_run(&self, client: &UmengPushClient, request: &UnicastRequest) -> Result<String> {
        let signed = client.prepare(request)?;
        Ok(format!(
            "{} {}?sign={}\n{}",
            signed.method(),
            signed.url(),
            signed.sign(),
            signed.body().as_str()
        ))
    }
}

/// 由命令行参数构造 Android 请求
pub fn android_request(args: AndroidArgs) -> Result<UnicastRequest> {
    let mut builder = AndroidPushNotification::builder(args.ticker, args.title, args.text);

    if let Some(url) = args.url {
        builder = builder.go_url(url);
    } else if let Some(activity) = args.activity {
        builder = builder.go_activity(activity);
    } else if let Some(custom) = args.custom {
        builder = builder.go_custom(parse_custom(custom));
    }
    if let Some(img) = args.img {
        builder = builder.img(img);
    }
    if let Some(icon) = args.icon {
        builder = builder.icon(icon);
    }
    if let Some(large_icon) = args.large_icon {
        builder = builder.large_icon(large_icon);
    }
    if let Some(sound) = args.sound {
        builder = builder.sound(sound);
    }
    if let Some(builder_id) = args.builder_id {
        builder = builder.builder_id(builder_id);
    }
    let notification = builder
        .play_vibrate(!args.no_vibrate)
        .play_lights(!args.no_lights)
        .play_sound(!args.no_sound)
        .build()?;

    let policy = if args.policy.is_empty() && args.max_send_num.is_none() {
        None
    } else {
        let mut builder = AndroidPushPolicy::builder();
        let PolicyArgs {
            start_time,
            expire_time,
            out_biz_no,
        } = args.policy;
        if let Some(start_time) = start_time {
            builder = builder.start_time(start_time);
        }
        if let Some(expire_time) = expire_time {
            builder = builder.expire_time(expire_time);
        }
        if let Some(out_biz_no) = out_biz_no {
            builder = builder.out_biz_no(out_biz_no);
        }
        if let Some(max_send_num) = args.max_send_num {
            builder = builder.max_send_num(max_send_num);
        }
        Some(builder.build()?)
    };

    let channel = args
        .mi_activity
        .map(AndroidSystemChannel::new)
        .transpose()?;

    Ok(UnicastRequest::new(
        args.device_token,
        PushPayload::android(notification, policy, channel),
        args.description,
    )?)
}

/// 由命令行参数构造 iOS 请求
pub fn ios_request(args: IosArgs) -> Result<UnicastRequest> {
    let notification = IosPushNotification::builder(args.title, args.subtitle, args.body)
        .badge(args.badge)
        .sound(args.sound)
        .build()?;

    let policy = if args.policy.is_empty() && args.collapse_id.is_none() {
        None
    } else {
        let mut builder = IosPushPolicy::builder();
        let PolicyArgs {
            start_time,
            expire_time,
            out_biz_no,
        } = args.policy;
        if let Some(start_time) = start_time {
            builder = builder.start_time(start_time);
        }
        if let Some(expire_time) = expire_time {
            builder = builder.expire_time(expire_time);
        }
        if let Some(out_biz_no) = out_biz_no {
            builder = builder.out_biz_no(out_biz_no);
        }
        if let Some(collapse_id) = args.collapse_id {
            builder = builder.apns_collapse_id(collapse_id);
        }
        Some(builder.build()?)
    };

    Ok(UnicastRequest::new(
        args.device_token,
        PushPayload::ios(notification, policy),
        args.description,
    )?)
}

/// 合法 JSON 按 JSON 发送，否则作为字符串发送
fn parse_custom(custom: String) -> Value {
    serde_json::from_str(&custom).unwrap_or(Value::String(custom))
}
