//! QSAN SAN 存储阵列 REST 管理接口客户端
//!
//! 提供与 QSAN 阵列管理 API 交互的客户端实现。
//!
//! # 功能
//!
//! - **认证** (`Client` / `AuthClient`): 登录、访问令牌自动刷新、刷新令牌过期后重新登录
//! - **存储池** (`PoolOp`): 存储池查询
//! - **卷管理** (`VolumeOp`): 卷 CRUD、克隆、元数据、QoS、快照
//! - **Target 管理** (`TargetOp`): iSCSI / FCP Target、LUN 映射、光纤通道端口
//!
//! # 示例
//!
//! ```ignore
//! use qsan_client::{csi_scopes, Client, ClientOptions, VolumeCreateOptions};
//!
//! let client = Client::new("192.168.1.20", ClientOptions::default())?;
//! let auth = client.get_auth_client("admin", "1234", &csi_scopes("1234")).await?;
//!
//! // 查询存储池
//! let pools = auth.pool().list_pools().await?;
//!
//! // 创建卷
//! let vol = auth
//!     .volume()
//!     .create_volume(&pools[0].id, "v1", 10240, &VolumeCreateOptions::default())
//!     .await?;
//!
//! auth.volume().delete_volume(&vol.id).await?;
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod scope;

pub use auth::{AuthClient, Credentials, TokenPair};
pub use client::{ApiRequest, Client, ClientOptions, Endpoint, RequestBody, Scheme};
pub use error::{vendor_code, QsanError, Result};
pub use scope::csi_scopes;

// 导出 API 模块
pub use api::{pool::PoolOp, target::TargetOp, volume::VolumeOp};

// 导出数据模型
pub use models::{
    // 存储池
    PoolData,

    // 卷
    QosData, SnapshotData, SnapshotMutableSetting, SnapshotSetting, VolumeCreateOptions,
    VolumeData, VolumeMetadata, VolumeModifyOptions, VolumeQosOptions, VolumeTags,

    // Target / LUN
    CreateTargetParam, FcData, FcErrCounter, FcpInfo, Host, Iscsi, IscsiInfo, LunData, LunHost,
    LunMapParam, LunPatchParam, PatchTargetParam, TargetData, TargetType,

    EmptyData,
};

// 传输层复用的取消令牌
pub use tokio_util::sync::CancellationToken;
