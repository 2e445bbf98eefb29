//! 公共工具函数模块
//!
//! 提供各命令模块共享的功能，包括：
//! - 加载配置
//! - QSAN 客户端创建和登录

use anyhow::{Context, Result};
use qsan_client::{AuthClient, CancellationToken, Client};
use std::path::Path;
use tracing::info;

use crate::config::QsanConfig;

/// 加载配置并登录阵列
pub async fn connect(config_path: Option<&Path>, cancel: &CancellationToken) -> Result<AuthClient> {
    let config = QsanConfig::load(config_path)?;
    create_auth_client(&config, cancel).await
}

/// 创建并登录 QSAN 客户端
pub async fn create_auth_client(config: &QsanConfig, cancel: &CancellationToken) -> Result<AuthClient> {
    config.validate()?;

    let client = Client::new(&config.array.host, config.client_options())
        .context("创建 QSAN 客户端失败")?
        .with_cancellation(cancel.clone());

    info!("登录阵列: {}", client.endpoint());

    client
        .get_auth_client(&config.auth.username, &config.auth.password, &config.scopes())
        .await
        .context("QSAN 登录失败")
}
