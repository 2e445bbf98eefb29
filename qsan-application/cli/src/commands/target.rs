//! Target、LUN 与光纤通道命令

use anyhow::{Context, Result};
use colored::Colorize;
use qsan_client::{CreateTargetParam, Host, Iscsi, LunMapParam, TargetType};

use crate::commands::common::connect;
use crate::commands::output::{output_formatted, output_one, print_status};
use crate::{FcAction, LunAction, RunContext, TargetAction};

/// 解析 Target 类型参数
fn parse_target_type(value: &str) -> Result<TargetType> {
    match value.to_lowercase().as_str() {
        "iscsi" => Ok(TargetType::Iscsi),
        "fcp" | "fc" => Ok(TargetType::Fcp),
        other => anyhow::bail!("不支持的 Target 类型: {} (可选 iscsi/fcp)", other),
    }
}

/// 未指定主机时允许所有主机访问
fn lun_hosts(hosts: Vec<String>) -> Vec<Host> {
    if hosts.is_empty() {
        vec![Host::any()]
    } else {
        hosts.into_iter().map(Host::new).collect()
    }
}

pub async fn handle(action: TargetAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;
    let targets = client.target();

    match action {
        TargetAction::List => {
            let list = targets.list_targets().await.context("查询 Target 列表失败")?;
            output_formatted(&list, &ctx.format)?;
        }

        TargetAction::Get { id, name } => {
            let target = match (id, name) {
                (Some(id), _) => targets
                    .list_target_by_id(&id)
                    .await
                    .with_context(|| format!("查询 Target {} 失败", id))?,
                (None, Some(name)) => targets
                    .find_target_by_name(&name)
                    .await
                    .with_context(|| format!("查找 Target {} 失败", name))?
                    .with_context(|| format!("Target {} 不存在", name))?,
                (None, None) => anyhow::bail!("请指定 Target ID 或 --name"),
            };
            output_one(&target, &ctx.format)?;
        }

        TargetAction::Create {
            name,
            target_type,
            eths,
        } => {
            let target_type = parse_target_type(&target_type)?;
            let iscsis = if target_type == TargetType::Iscsi && !eths.is_empty() {
                vec![Iscsi {
                    eths,
                    ..Default::default()
                }]
            } else {
                Vec::new()
            };

            let target = targets
                .create_target(&CreateTargetParam {
                    name: name.clone(),
                    target_type,
                    iscsis,
                })
                .await
                .with_context(|| format!("创建 Target {} 失败", name))?;

            print_status(
                &ctx.format,
                format!("{} Target {} 创建成功", "✓".green().bold(), target.name.cyan().bold()),
            );
            output_one(&target, &ctx.format)?;
        }

        TargetAction::Delete { id } => {
            targets
                .delete_target(&id)
                .await
                .with_context(|| format!("删除 Target {} 失败", id))?;
            print_status(
                &ctx.format,
                format!("{} Target {} 已删除", "✓".green().bold(), id.cyan().bold()),
            );
        }
    }

    Ok(())
}

pub async fn handle_lun(action: LunAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;
    let targets = client.target();

    match action {
        LunAction::List { target } => {
            let luns = targets
                .list_all_luns(&target)
                .await
                .with_context(|| format!("查询 Target {} 的 LUN 失败", target))?;
            output_formatted(&luns, &ctx.format)?;
        }

        LunAction::Map {
            target,
            volume,
            hosts,
            lun,
        } => {
            let param = LunMapParam {
                name: lun,
                volume_id: volume.clone(),
                hosts: lun_hosts(hosts),
            };
            let mapped = targets
                .map_lun(&target, &param)
                .await
                .with_context(|| format!("映射卷 {} 失败", volume))?;

            print_status(
                &ctx.format,
                format!(
                    "{} 卷 {} 已映射为 LUN {}",
                    "✓".green().bold(),
                    volume.cyan(),
                    mapped.name.cyan().bold()
                ),
            );
            output_one(&mapped, &ctx.format)?;
        }

        LunAction::Unmap { target, lun } => {
            targets
                .unmap_lun(&target, &lun)
                .await
                .with_context(|| format!("取消 LUN {} 映射失败", lun))?;
            print_status(
                &ctx.format,
                format!("{} LUN {} 已取消映射", "✓".green().bold(), lun.cyan().bold()),
            );
        }
    }

    Ok(())
}

pub async fn handle_fc(action: FcAction, ctx: &RunContext) -> Result<()> {
    let client = connect(ctx.config_path.as_deref(), &ctx.cancel).await?;

    match action {
        FcAction::List => {
            let ports = client.target().list_fc().await.context("查询光纤通道端口失败")?;
            output_formatted(&ports, &ctx.format)?;
        }
    }

    Ok(())
}
