//! 卷、QoS 与快照模型

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// 卷信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeData {
    pub id: String,
    pub name: String,
    pub pool_id: String,

    /// 已映射的 LUN，未映射时为 null
    pub lun_id: serde_json::Value,

    pub online: bool,
    pub health: String,

    /// 卷状态（克隆、初始化过程中会变化）
    pub state: String,

    /// 后台任务进度（%）
    pub progress: u32,

    pub provision: String,

    /// 容量（MB）
    pub total_size: u64,
    pub used_size: u64,

    pub block_size: u64,
    pub stripe_size: u64,
    pub cache_mode: String,
    pub io_priority: String,
    pub bg_io_priority: String,
    pub enable_read_ahead: bool,
    pub erase_data: String,
    pub enable_fast_raid_rebuild: bool,

    /// 目标响应时间（ms）
    pub target_response_time: u64,
    pub max_iops: u64,
    pub max_throughput: u64,

    pub tags: VolumeTags,

    /// 调用方自定义元数据
    pub metadata: Option<VolumeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeTags {
    pub wwn: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 卷元数据，`content` 为 base64 编码
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeMetadata {
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl VolumeMetadata {
    pub fn new(status: &str, kind: &str, content: &[u8]) -> Self {
        Self {
            status: status.to_string(),
            kind: kind.to_string(),
            content: STANDARD.encode(content),
        }
    }

    /// 解码 `content`
    pub fn content_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content)
    }
}

/// 创建卷的可选参数
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeCreateOptions {
    /// 块大小：1024, 2048 ... 65536
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_io_priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_read_ahead: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VolumeMetadata>,
}

/// 卷 QoS 参数
///
/// `io_priority` 需为 `HIGH`，`target_response_time` 才会生效。
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeQosOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_response_time: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iops: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_throughput: Option<u64>,
}

/// 修改卷参数，未设置的字段不会发送
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeModifyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_io_priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_read_ahead: Option<bool>,

    #[serde(flatten)]
    pub qos: VolumeQosOptions,
}

/// 全局卷 QoS 设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QosData {
    pub enable_qos: bool,

    /// `NONE` / `IO_PRIORITY` / `MAX_IOPS_THROUGHPUT`
    pub qos_rule: String,
}

/// 卷快照空间设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotSetting {
    /// 快照空间（MB），0 表示未启用
    pub total_size: u64,
    pub used_size: u64,

    /// 启用快照所需的最小空间（MB）
    pub minimum_size: u64,
}

/// 可修改的快照空间设置
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMutableSetting {
    pub total_size: u64,
}

/// 快照信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotData {
    pub id: String,
    pub name: String,
    pub status: String,
    pub used_size: u64,
}
