//! QSAN REST API 数据模型
//!
//! 响应结构体均允许字段缺失（缺失时取默认值），未知字段会被忽略。

pub mod pool;
pub mod target;
pub mod volume;

pub use pool::PoolData;
pub use target::{
    CreateTargetParam, FcData, FcErrCounter, FcpInfo, Host, Iscsi, IscsiInfo, LunData, LunHost,
    LunMapParam, LunPatchParam, PatchTargetParam, TargetData, TargetType,
};
pub use volume::{
    QosData, SnapshotData, SnapshotMutableSetting, SnapshotSetting, VolumeCreateOptions,
    VolumeData, VolumeMetadata, VolumeModifyOptions, VolumeQosOptions, VolumeTags,
};

/// 删除类接口返回的空数组
pub type EmptyData = Vec<serde_json::Value>;
