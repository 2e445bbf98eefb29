//! 存储池命令

use anyhow::{Context, Result};

use crate::commands::common::connect;
use crate::commands::output::{output_formatted, output_one};
use crate::{PoolAction, RunContext};

pub async fn handle(action: PoolAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;

    match action {
        PoolAction::List => {
            let pools = client.pool().list_pools().await.context("查询存储池失败")?;
            output_formatted(&pools, &ctx.format)?;
        }
        PoolAction::Get { id } => {
            let pool = client
                .pool()
                .list_pool_by_id(&id)
                .await
                .with_context(|| format!("查询存储池 {} 失败", id))?;
            output_one(&pool, &ctx.format)?;
        }
    }

    Ok(())
}
