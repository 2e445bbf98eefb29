//! CLI 命令处理模块

pub mod common; // 公共工具函数
pub mod config; // 配置文件管理
pub mod output;
pub mod pool;
pub mod target; // Target / LUN / 光纤通道
pub mod volume; // 卷 / 快照 / QoS
