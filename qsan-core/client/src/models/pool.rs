use serde::{Deserialize, Serialize};

/// 存储池信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolData {
    /// 存储池 ID
    pub id: String,

    /// 存储池名称
    pub name: String,

    /// 配置类型（THICK / THIN）
    pub provision: String,

    /// 是否启用自动分层
    pub auto_tiering: bool,

    /// RAID 级别
    pub raid_level: String,

    /// 卷数量
    pub num_of_volumes: u32,
}
