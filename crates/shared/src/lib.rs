//! 共享库
//!
//! 包含推送客户端与命令行工具共用的配置加载和可观测性基础设施代码。

pub mod config;
pub mod observability;
