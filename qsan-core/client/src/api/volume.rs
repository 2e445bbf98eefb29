//! 卷管理 API
//!
//! 提供卷生命周期管理功能，包括：
//! - 卷 CRUD 与克隆
//! - 卷元数据
//! - 全局 QoS 设置
//! - 快照空间设置与快照 CRUD / 回滚

use serde::Serialize;
use serde_json::json;
use tracing::info;
use urlencoding::encode;

use crate::auth::AuthClient;
use crate::client::ApiRequest;
use crate::error::Result;
use crate::models::{
    EmptyData, QosData, SnapshotData, SnapshotMutableSetting, SnapshotSetting,
    VolumeCreateOptions, VolumeData, VolumeMetadata, VolumeModifyOptions,
};

const VOLUMES_PATH: &str = "/rest/v2/storage/block/volumes";
const QOS_PATH: &str = "/rest/v2/storage/qos/volumes";
const SNAPSHOT_TARGETS_PATH: &str = "/rest/v2/backup/snapshot/targets";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVolumeBody<'b> {
    name: &'b str,
    total_size: u64,
    pool_id: &'b str,
    #[serde(flatten)]
    options: &'b VolumeCreateOptions,
}

/// 卷管理 API
pub struct VolumeOp<'a> {
    client: &'a AuthClient,
}

impl<'a> VolumeOp<'a> {
    pub fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    // ============================================
    // 卷管理
    // ============================================

    /// 查询所有卷
    pub async fn list_volumes(&self) -> Result<Vec<VolumeData>> {
        info!("查询卷列表");
        self.client.send_request(&ApiRequest::get(VOLUMES_PATH)).await
    }

    /// 查询指定卷
    pub async fn list_volume_by_id(&self, vol_id: &str) -> Result<VolumeData> {
        info!("查询卷详情: {}", vol_id);
        self.client.send_request(&ApiRequest::get(volume_path(vol_id))).await
    }

    /// 查询存储池下的所有卷
    pub async fn list_volumes_by_pool_id(&self, pool_id: &str) -> Result<Vec<VolumeData>> {
        info!("查询存储池下的卷: {}", pool_id);
        let req = ApiRequest::get(VOLUMES_PATH).query("q", format!("poolId='{}'", pool_id));
        self.client.send_request(&req).await
    }

    /// 在存储池上创建卷
    ///
    /// # Arguments
    /// * `pool_id` - 存储池 ID
    /// * `name` - 卷名称
    /// * `size` - 容量（MB）
    /// * `options` - 可选参数
    pub async fn create_volume(
        &self,
        pool_id: &str,
        name: &str,
        size: u64,
        options: &VolumeCreateOptions,
    ) -> Result<VolumeData> {
        info!("创建卷: {} ({} MB) -> 存储池 {}", name, size, pool_id);
        let req = ApiRequest::post(VOLUMES_PATH).json(&CreateVolumeBody {
            name,
            total_size: size,
            pool_id,
            options,
        })?;
        self.client.send_request(&req).await
    }

    /// 修改卷配置（包括卷级 QoS）
    pub async fn modify_volume(&self, vol_id: &str, options: &VolumeModifyOptions) -> Result<VolumeData> {
        info!("修改卷: {}", vol_id);
        let req = ApiRequest::patch(volume_path(vol_id)).json(options)?;
        self.client.send_request(&req).await
    }

    /// 删除卷
    pub async fn delete_volume(&self, vol_id: &str) -> Result<()> {
        info!("删除卷: {}", vol_id);
        let _: EmptyData = self
            .client
            .send_request(&ApiRequest::delete(volume_path(vol_id)))
            .await?;
        Ok(())
    }

    /// 克隆卷到指定存储池
    pub async fn clone_volume(&self, vol_id: &str, name: &str, pool_id: &str) -> Result<VolumeData> {
        info!("克隆卷: {} -> {} (存储池 {})", vol_id, name, pool_id);
        let req = ApiRequest::post(format!("{}/clone", volume_path(vol_id)))
            .json(&json!({ "name": name, "poolId": pool_id }))?;
        self.client.send_request(&req).await
    }

    // ============================================
    // 元数据
    // ============================================

    /// 获取卷元数据
    pub async fn get_metadata(&self, vol_id: &str) -> Result<Option<VolumeMetadata>> {
        info!("获取卷元数据: {}", vol_id);
        let volume = self.list_volume_by_id(vol_id).await?;
        Ok(volume.metadata)
    }

    /// 设置卷元数据，返回阵列保存后的元数据
    pub async fn set_metadata(
        &self,
        vol_id: &str,
        status: &str,
        kind: &str,
        content: &[u8],
    ) -> Result<Option<VolumeMetadata>> {
        info!("设置卷元数据: {} ({} 字节)", vol_id, content.len());
        let metadata = VolumeMetadata::new(status, kind, content);
        let req = ApiRequest::patch(volume_path(vol_id)).json(&json!({ "metadata": metadata }))?;
        let volume: VolumeData = self.client.send_request(&req).await?;
        Ok(volume.metadata)
    }

    // ============================================
    // QoS
    // ============================================

    /// 获取全局卷 QoS 设置
    pub async fn get_qos(&self) -> Result<QosData> {
        info!("获取卷 QoS 设置");
        self.client.send_request(&ApiRequest::get(QOS_PATH)).await
    }

    /// 修改全局卷 QoS 设置
    ///
    /// 关闭 QoS 时阵列会把规则置为 `NONE`。
    pub async fn set_qos(&self, enable: bool, rule: &str) -> Result<QosData> {
        info!("修改卷 QoS 设置: enable={}, rule={}", enable, rule);
        let req = ApiRequest::patch(QOS_PATH).json(&json!({ "enableQos": enable, "qosRule": rule }))?;
        self.client.send_request(&req).await
    }

    // ============================================
    // 快照
    // ============================================

    /// 获取卷快照空间设置
    pub async fn get_snapshot_setting(&self, vol_id: &str) -> Result<SnapshotSetting> {
        info!("获取卷快照设置: {}", vol_id);
        self.client
            .send_request(&ApiRequest::get(snapshot_target_path(vol_id)))
            .await
    }

    /// 修改卷快照空间，`total_size` 为 0 时关闭快照
    pub async fn set_snapshot_setting(
        &self,
        vol_id: &str,
        setting: &SnapshotMutableSetting,
    ) -> Result<SnapshotSetting> {
        info!("修改卷快照设置: {} -> {} MB", vol_id, setting.total_size);
        let req = ApiRequest::patch(snapshot_target_path(vol_id)).json(setting)?;
        self.client.send_request(&req).await
    }

    /// 查询卷的所有快照
    pub async fn list_snapshots(&self, vol_id: &str) -> Result<Vec<SnapshotData>> {
        info!("查询卷快照列表: {}", vol_id);
        self.client.send_request(&ApiRequest::get(snapshots_path(vol_id))).await
    }

    /// 创建快照
    pub async fn create_snapshot(&self, vol_id: &str, name: &str) -> Result<SnapshotData> {
        info!("创建快照: {} -> {}", vol_id, name);
        let req = ApiRequest::post(snapshots_path(vol_id)).json(&json!({ "name": name }))?;
        self.client.send_request(&req).await
    }

    /// 查询单个快照
    pub async fn get_snapshot(&self, vol_id: &str, snap_id: &str) -> Result<SnapshotData> {
        info!("查询快照详情: {}/{}", vol_id, snap_id);
        self.client
            .send_request(&ApiRequest::get(snapshot_path(vol_id, snap_id)))
            .await
    }

    /// 删除快照
    pub async fn delete_snapshot(&self, vol_id: &str, snap_id: &str) -> Result<()> {
        info!("删除快照: {}/{}", vol_id, snap_id);
        let _: EmptyData = self
            .client
            .send_request(&ApiRequest::delete(snapshot_path(vol_id, snap_id)))
            .await?;
        Ok(())
    }

    /// 删除卷的所有快照
    pub async fn delete_all_snapshots(&self, vol_id: &str) -> Result<()> {
        info!("删除卷的所有快照: {}", vol_id);
        let _: EmptyData = self
            .client
            .send_request(&ApiRequest::delete(snapshots_path(vol_id)))
            .await?;
        Ok(())
    }

    /// 回滚到指定快照，之后创建的快照会被阵列删除
    pub async fn rollback_snapshot(&self, vol_id: &str, snap_id: &str) -> Result<()> {
        info!("回滚快照: {}/{}", vol_id, snap_id);
        let req = ApiRequest::post(format!("{}/rollback", snapshot_path(vol_id, snap_id)));
        let _: serde_json::Value = self.client.send_request(&req).await?;
        Ok(())
    }
}

fn volume_path(vol_id: &str) -> String {
    format!("{}/{}", VOLUMES_PATH, encode(vol_id))
}

fn snapshot_target_path(vol_id: &str) -> String {
    format!("{}/{}", SNAPSHOT_TARGETS_PATH, encode(vol_id))
}

fn snapshots_path(vol_id: &str) -> String {
    format!("{}/snapshots", snapshot_target_path(vol_id))
}

fn snapshot_path(vol_id: &str, snap_id: &str) -> String {
    format!("{}/{}", snapshots_path(vol_id), encode(snap_id))
}
