//! QSAN CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use qsan_client::CancellationToken;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "qsan")]
#[command(about = "QSAN 存储阵列管理工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 配置文件路径（默认 ~/.config/qsan/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 输出格式 (table/json)
    #[arg(short = 'f', long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 存储池管理
    Pool {
        #[command(subcommand)]
        action: PoolAction,
    },

    /// 卷管理
    Volume {
        #[command(subcommand)]
        action: VolumeAction,
    },

    /// 快照管理
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// 全局卷 QoS
    Qos {
        #[command(subcommand)]
        action: QosAction,
    },

    /// Target 管理
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },

    /// LUN 映射管理
    Lun {
        #[command(subcommand)]
        action: LunAction,
    },

    /// 光纤通道端口
    Fc {
        #[command(subcommand)]
        action: FcAction,
    },

    /// 配置文件管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum PoolAction {
    /// 列出存储池
    List,
    /// 查看存储池详情
    Get {
        /// 存储池 ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum VolumeAction {
    /// 列出卷
    List {
        /// 只列出指定存储池的卷
        #[arg(short, long)]
        pool: Option<String>,
    },

    /// 查看卷详情
    Get {
        /// 卷 ID
        id: String,
    },

    /// 创建卷
    Create {
        /// 存储池 ID
        #[arg(short, long)]
        pool: String,

        /// 卷名称
        #[arg(short, long)]
        name: String,

        /// 容量（MB）
        #[arg(short, long)]
        size: u64,

        /// 块大小
        #[arg(long)]
        block_size: Option<u64>,

        /// 缓存模式 (WRITE_THROUGH/WRITE_BACK)
        #[arg(long)]
        cache_mode: Option<String>,

        /// IO 优先级 (HIGH/MEDIUM/LOW)
        #[arg(long)]
        io_priority: Option<String>,

        /// 启用预读
        #[arg(long)]
        read_ahead: Option<bool>,
    },

    /// 修改卷
    Modify {
        /// 卷 ID
        id: String,

        /// 新名称
        #[arg(short, long)]
        name: Option<String>,

        /// 新容量（MB）
        #[arg(short, long)]
        size: Option<u64>,

        /// 缓存模式
        #[arg(long)]
        cache_mode: Option<String>,

        /// 后台 IO 优先级
        #[arg(long)]
        bg_io_priority: Option<String>,

        /// 启用预读
        #[arg(long)]
        read_ahead: Option<bool>,

        /// IO 优先级
        #[arg(long)]
        io_priority: Option<String>,

        /// 目标响应时间（ms）
        #[arg(long)]
        target_response_time: Option<u64>,

        /// 最大 IOPS
        #[arg(long)]
        max_iops: Option<u64>,

        /// 最大吞吐量
        #[arg(long)]
        max_throughput: Option<u64>,
    },

    /// 删除卷
    Delete {
        /// 卷 ID
        id: String,
    },

    /// 克隆卷
    Clone {
        /// 源卷 ID
        id: String,

        /// 新卷名称
        #[arg(short, long)]
        name: String,

        /// 目标存储池 ID
        #[arg(short, long)]
        pool: String,
    },
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// 列出卷的快照
    List {
        /// 卷 ID
        volume: String,
    },

    /// 创建快照
    Create {
        /// 卷 ID
        volume: String,

        /// 快照名称
        #[arg(short, long)]
        name: String,
    },

    /// 删除快照
    Delete {
        /// 卷 ID
        volume: String,

        /// 快照 ID
        #[arg(required_unless_present = "all")]
        snapshot: Option<String>,

        /// 删除卷的所有快照
        #[arg(long, conflicts_with = "snapshot")]
        all: bool,
    },

    /// 回滚到快照
    Rollback {
        /// 卷 ID
        volume: String,

        /// 快照 ID
        snapshot: String,
    },
}

#[derive(Subcommand)]
pub enum QosAction {
    /// 查看全局 QoS 设置
    Get,

    /// 修改全局 QoS 设置
    Set {
        /// 启用 QoS
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// 关闭 QoS
        #[arg(long, conflicts_with = "enable")]
        disable: bool,

        /// QoS 规则 (IO_PRIORITY/MAX_IOPS_THROUGHPUT)
        #[arg(short, long, default_value = "IO_PRIORITY")]
        rule: String,
    },
}

#[derive(Subcommand)]
pub enum TargetAction {
    /// 列出 Target
    List,

    /// 查看 Target 详情
    Get {
        /// Target ID
        #[arg(required_unless_present = "name")]
        id: Option<String>,

        /// 按名称查找
        #[arg(short, long, conflicts_with = "id")]
        name: Option<String>,
    },

    /// 创建 Target
    Create {
        /// Target 名称
        #[arg(short, long)]
        name: String,

        /// 类型 (iscsi/fcp)
        #[arg(short = 't', long = "type", default_value = "iscsi")]
        target_type: String,

        /// iSCSI 网口，可重复指定
        #[arg(long = "eth")]
        eths: Vec<String>,
    },

    /// 删除 Target
    Delete {
        /// Target ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum LunAction {
    /// 列出 Target 下的 LUN
    List {
        /// Target ID
        target: String,
    },

    /// 映射卷为 LUN
    Map {
        /// Target ID
        target: String,

        /// 卷 ID
        #[arg(short, long)]
        volume: String,

        /// 允许访问的主机，可重复指定，默认所有主机
        #[arg(long = "host")]
        hosts: Vec<String>,

        /// LUN 编号
        #[arg(long)]
        lun: Option<String>,
    },

    /// 取消 LUN 映射
    Unmap {
        /// Target ID
        target: String,

        /// LUN ID
        lun: String,
    },
}

#[derive(Subcommand)]
pub enum FcAction {
    /// 列出光纤通道端口
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 生成配置文件
    Init {
        /// 阵列地址
        #[arg(long)]
        host: String,

        /// 用户名
        #[arg(short, long, default_value = "admin")]
        username: String,

        /// 密码
        #[arg(short, long, default_value = "")]
        password: String,

        /// 使用 HTTPS
        #[arg(long)]
        https: bool,

        /// 覆盖已有配置文件
        #[arg(long)]
        force: bool,
    },

    /// 显示当前配置（隐藏密码）
    Show,
}

/// 命令执行上下文
pub struct RunContext {
    pub config_path: Option<PathBuf>,
    pub format: String,
    pub cancel: CancellationToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，RUST_LOG 优先
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("QSAN CLI 启动");

    // Ctrl-C 取消进行中的请求
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到中断信号，取消请求");
            trigger.cancel();
        }
    });

    let ctx = RunContext {
        config_path: cli.config,
        format: cli.format,
        cancel,
    };

    // 处理命令
    match cli.command {
        Commands::Pool { action } => commands::pool::handle(action, &ctx).await?,
        Commands::Volume { action } => commands::volume::handle(action, &ctx).await?,
        Commands::Snapshot { action } => commands::volume::handle_snapshot(action, &ctx).await?,
        Commands::Qos { action } => commands::volume::handle_qos(action, &ctx).await?,
        Commands::Target { action } => commands::target::handle(action, &ctx).await?,
        Commands::Lun { action } => commands::target::handle_lun(action, &ctx).await?,
        Commands::Fc { action } => commands::target::handle_fc(action, &ctx).await?,
        Commands::Config { action } => commands::config::handle(action, &ctx)?,
    }

    Ok(())
}
