//! Target / LUN 管理 API

use tracing::{debug, info};
use urlencoding::encode;

use crate::auth::AuthClient;
use crate::client::ApiRequest;
use crate::error::Result;
use crate::models::{
    CreateTargetParam, EmptyData, FcData, LunData, LunMapParam, LunPatchParam, PatchTargetParam,
    TargetData,
};

const TARGETS_PATH: &str = "/rest/v2/dataTransfer/targets";
const FIBRE_CHANNEL_PATH: &str = "/rest/v2/dataTransfer/protocol/fibreChannel";

/// Target / LUN 管理 API
pub struct TargetOp<'a> {
    client: &'a AuthClient,
}

impl<'a> TargetOp<'a> {
    pub fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    /// 查询所有 Target
    pub async fn list_targets(&self) -> Result<Vec<TargetData>> {
        info!("查询 Target 列表");
        self.client.send_request(&ApiRequest::get(TARGETS_PATH)).await
    }

    /// 按名称查找 Target
    ///
    /// 阵列不支持按名称过滤，这里在客户端筛选。
    pub async fn find_target_by_name(&self, name: &str) -> Result<Option<TargetData>> {
        let targets = self.list_targets().await?;
        let found = targets.into_iter().find(|t| t.name == name);
        debug!("按名称查找 Target {}: {}", name, found.is_some());
        Ok(found)
    }

    /// 查询指定 Target
    pub async fn list_target_by_id(&self, target_id: &str) -> Result<TargetData> {
        info!("查询 Target 详情: {}", target_id);
        self.client
            .send_request(&ApiRequest::get(target_path(target_id)))
            .await
    }

    /// 创建 Target
    pub async fn create_target(&self, param: &CreateTargetParam) -> Result<TargetData> {
        info!("创建 Target: {} ({:?})", param.name, param.target_type);
        let req = ApiRequest::post(TARGETS_PATH).json(param)?;
        self.client.send_request(&req).await
    }

    /// 修改 Target
    pub async fn patch_target(&self, target_id: &str, param: &PatchTargetParam) -> Result<TargetData> {
        info!("修改 Target: {}", target_id);
        let req = ApiRequest::patch(target_path(target_id)).json(param)?;
        self.client.send_request(&req).await
    }

    /// 删除 Target
    pub async fn delete_target(&self, target_id: &str) -> Result<()> {
        info!("删除 Target: {}", target_id);
        let _: EmptyData = self
            .client
            .send_request(&ApiRequest::delete(target_path(target_id)))
            .await?;
        Ok(())
    }

    // ============================================
    // LUN 映射
    // ============================================

    /// 将卷映射为 Target 下的 LUN
    pub async fn map_lun(&self, target_id: &str, param: &LunMapParam) -> Result<LunData> {
        info!("映射 LUN: 卷 {} -> Target {}", param.volume_id, target_id);
        let req = ApiRequest::post(luns_path(target_id)).json(param)?;
        self.client.send_request(&req).await
    }

    /// 取消 LUN 映射
    pub async fn unmap_lun(&self, target_id: &str, lun_id: &str) -> Result<()> {
        info!("取消 LUN 映射: {}/{}", target_id, lun_id);
        let _: EmptyData = self
            .client
            .send_request(&ApiRequest::delete(lun_path(target_id, lun_id)))
            .await?;
        Ok(())
    }

    /// 查询 Target 下的所有 LUN
    pub async fn list_all_luns(&self, target_id: &str) -> Result<Vec<LunData>> {
        info!("查询 LUN 列表: {}", target_id);
        self.client.send_request(&ApiRequest::get(luns_path(target_id))).await
    }

    /// 查询指定 LUN
    pub async fn list_target_lun(&self, target_id: &str, lun_id: &str) -> Result<LunData> {
        info!("查询 LUN 详情: {}/{}", target_id, lun_id);
        self.client
            .send_request(&ApiRequest::get(lun_path(target_id, lun_id)))
            .await
    }

    /// 修改 LUN
    pub async fn patch_target_lun(
        &self,
        target_id: &str,
        lun_id: &str,
        param: &LunPatchParam,
    ) -> Result<LunData> {
        info!("修改 LUN: {}/{}", target_id, lun_id);
        let req = ApiRequest::patch(lun_path(target_id, lun_id)).json(param)?;
        self.client.send_request(&req).await
    }

    // ============================================
    // 光纤通道
    // ============================================

    /// 查询光纤通道端口
    pub async fn list_fc(&self) -> Result<Vec<FcData>> {
        info!("查询光纤通道端口");
        self.client.send_request(&ApiRequest::get(FIBRE_CHANNEL_PATH)).await
    }
}

fn target_path(target_id: &str) -> String {
    format!("{}/{}", TARGETS_PATH, encode(target_id))
}

fn luns_path(target_id: &str) -> String {
    format!("{}/luns", target_path(target_id))
}

fn lun_path(target_id: &str, lun_id: &str) -> String {
    format!("{}/{}", luns_path(target_id), encode(lun_id))
}
