//! QSAN 资源操作 API
//!
//! 每个操作对应一次 HTTP 调用：
//! - 存储池查询 (PoolOp)
//! - 卷、QoS、快照、克隆 (VolumeOp)
//! - Target、LUN 映射、光纤通道端口 (TargetOp)

pub mod pool;
pub mod target;
pub mod volume;

pub use pool::PoolOp;
pub use target::TargetOp;
pub use volume::VolumeOp;
