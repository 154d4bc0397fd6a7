//! 友盟推送命令行工具
//!
//! 负责加载配置、初始化日志，并把命令行参数转换为推送客户端调用。

pub mod cli;
