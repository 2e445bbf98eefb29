//! 卷、快照与 QoS 命令

use anyhow::{Context, Result};
use colored::Colorize;
use qsan_client::{VolumeCreateOptions, VolumeModifyOptions, VolumeQosOptions};

use crate::commands::common::connect;
use crate::commands::output::{output_formatted, output_one, print_json, print_status};
use crate::{QosAction, RunContext, SnapshotAction, VolumeAction};

pub async fn handle(action: VolumeAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;
    let volumes = client.volume();

    match action {
        VolumeAction::List { pool } => {
            let list = match pool.as_deref() {
                Some(pool_id) => volumes.list_volumes_by_pool_id(pool_id).await,
                None => volumes.list_volumes().await,
            }
            .context("查询卷列表失败")?;
            output_formatted(&list, &ctx.format)?;
        }

        VolumeAction::Get { id } => {
            let volume = volumes
                .list_volume_by_id(&id)
                .await
                .with_context(|| format!("查询卷 {} 失败", id))?;
            output_one(&volume, &ctx.format)?;
        }

        VolumeAction::Create {
            pool,
            name,
            size,
            block_size,
            cache_mode,
            io_priority,
            read_ahead,
        } => {
            let options = VolumeCreateOptions {
                block_size,
                cache_mode,
                io_priority,
                enable_read_ahead: read_ahead,
                ..Default::default()
            };
            let volume = volumes
                .create_volume(&pool, &name, size, &options)
                .await
                .with_context(|| format!("创建卷 {} 失败", name))?;

            print_status(
                &ctx.format,
                format!("{} 卷 {} 创建成功", "✓".green().bold(), volume.name.cyan().bold()),
            );
            output_one(&volume, &ctx.format)?;
        }

        VolumeAction::Modify {
            id,
            name,
            size,
            cache_mode,
            bg_io_priority,
            read_ahead,
            io_priority,
            target_response_time,
            max_iops,
            max_throughput,
        } => {
            let options = VolumeModifyOptions {
                name,
                total_size: size,
                bg_io_priority,
                cache_mode,
                enable_read_ahead: read_ahead,
                qos: VolumeQosOptions {
                    io_priority,
                    target_response_time,
                    max_iops,
                    max_throughput,
                },
            };
            let volume = volumes
                .modify_volume(&id, &options)
                .await
                .with_context(|| format!("修改卷 {} 失败", id))?;
            output_one(&volume, &ctx.format)?;
        }

        VolumeAction::Delete { id } => {
            volumes
                .delete_volume(&id)
                .await
                .with_context(|| format!("删除卷 {} 失败", id))?;
            print_status(
                &ctx.format,
                format!("{} 卷 {} 已删除", "✓".green().bold(), id.cyan().bold()),
            );
        }

        VolumeAction::Clone { id, name, pool } => {
            let volume = volumes
                .clone_volume(&id, &name, &pool)
                .await
                .with_context(|| format!("克隆卷 {} 失败", id))?;

            print_status(
                &ctx.format,
                format!(
                    "{} 卷 {} 克隆为 {} (进度 {}%)",
                    "✓".green().bold(),
                    id.cyan(),
                    volume.name.cyan().bold(),
                    volume.progress
                ),
            );
            output_one(&volume, &ctx.format)?;
        }
    }

    Ok(())
}

pub async fn handle_snapshot(action: SnapshotAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;
    let volumes = client.volume();

    match action {
        SnapshotAction::List { volume } => {
            let snapshots = volumes
                .list_snapshots(&volume)
                .await
                .with_context(|| format!("查询卷 {} 的快照失败", volume))?;
            output_formatted(&snapshots, &ctx.format)?;
        }

        SnapshotAction::Create { volume, name } => {
            let snapshot = volumes
                .create_snapshot(&volume, &name)
                .await
                .with_context(|| format!("创建快照 {} 失败", name))?;
            print_status(
                &ctx.format,
                format!("{} 快照 {} 创建成功", "✓".green().bold(), snapshot.name.cyan().bold()),
            );
            output_one(&snapshot, &ctx.format)?;
        }

        SnapshotAction::Delete {
            volume,
            snapshot,
            all,
        } => match snapshot {
            Some(snap_id) if !all => {
                volumes
                    .delete_snapshot(&volume, &snap_id)
                    .await
                    .with_context(|| format!("删除快照 {} 失败", snap_id))?;
                print_status(
                    &ctx.format,
                    format!("{} 快照 {} 已删除", "✓".green().bold(), snap_id.cyan().bold()),
                );
            }
            _ => {
                volumes
                    .delete_all_snapshots(&volume)
                    .await
                    .with_context(|| format!("删除卷 {} 的快照失败", volume))?;
                print_status(
                    &ctx.format,
                    format!("{} 卷 {} 的所有快照已删除", "✓".green().bold(), volume.cyan().bold()),
                );
            }
        },

        SnapshotAction::Rollback { volume, snapshot } => {
            volumes
                .rollback_snapshot(&volume, &snapshot)
                .await
                .with_context(|| format!("回滚快照 {} 失败", snapshot))?;
            print_status(
                &ctx.format,
                format!(
                    "{} 卷 {} 已回滚到快照 {}",
                    "✓".green().bold(),
                    volume.cyan(),
                    snapshot.cyan().bold()
                ),
            );
        }
    }

    Ok(())
}

pub async fn handle_qos(action: QosAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;
    let volumes = client.volume();

    let qos = match action {
        QosAction::Get => volumes.get_qos().await.context("查询 QoS 设置失败")?,
        QosAction::Set {
            enable,
            disable,
            rule,
        } => {
            if !enable && !disable {
                anyhow::bail!("请指定 --enable 或 --disable");
            }
            volumes
                .set_qos(enable, &rule)
                .await
                .context("修改 QoS 设置失败")?
        }
    };

    match ctx.format.as_str() {
        "json" => print_json(&qos)?,
        _ => {
            let state = if qos.enable_qos {
                "启用".green()
            } else {
                "关闭".yellow()
            };
            println!("QoS: {}", state);
            println!("规则: {}", qos.qos_rule);
        }
    }

    Ok(())
}
