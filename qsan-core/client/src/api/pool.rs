//! 存储池 API

use tracing::info;
use urlencoding::encode;

use crate::auth::AuthClient;
use crate::client::ApiRequest;
use crate::error::Result;
use crate::models::PoolData;

const POOLS_PATH: &str = "/rest/v2/storage/pools";

/// 存储池 API
pub struct PoolOp<'a> {
    client: &'a AuthClient,
}

impl<'a> PoolOp<'a> {
    pub fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    /// 查询所有存储池
    pub async fn list_pools(&self) -> Result<Vec<PoolData>> {
        info!("查询存储池列表");
        self.client.send_request(&ApiRequest::get(POOLS_PATH)).await
    }

    /// 查询指定存储池
    pub async fn list_pool_by_id(&self, pool_id: &str) -> Result<PoolData> {
        info!("查询存储池详情: {}", pool_id);
        self.client
            .send_request(&ApiRequest::get(format!("{}/{}", POOLS_PATH, encode(pool_id))))
            .await
    }
}
