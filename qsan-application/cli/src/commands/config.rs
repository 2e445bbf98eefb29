//! 配置文件管理命令

use anyhow::Result;
use colored::Colorize;

use crate::commands::output::print_json;
use crate::config::QsanConfig;
use crate::{ConfigAction, RunContext};

pub fn handle(action: ConfigAction, ctx: &RunContext) -> Result<()> {
    match action {
        ConfigAction::Init {
            host,
            username,
            password,
            https,
            force,
        } => init_config(ctx, host, username, password, https, force),
        ConfigAction::Show => show_config(ctx),
    }
}

fn init_config(
    ctx: &RunContext,
    host: String,
    username: String,
    password: String,
    https: bool,
    force: bool,
) -> Result<()> {
    let path = match &ctx.config_path {
        Some(p) => p.clone(),
        None => QsanConfig::default_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!("配置文件已存在: {:?}，使用 --force 覆盖", path);
    }

    let mut config = QsanConfig::default();
    config.array.host = host;
    config.array.https = https;
    config.auth.username = username;
    config.auth.password = password;
    config.save_to(&path)?;

    println!("{} 配置文件已写入: {}", "✓".green().bold(), path.display().to_string().cyan());
    Ok(())
}

fn show_config(ctx: &RunContext) -> Result<()> {
    let config = QsanConfig::load(ctx.config_path.as_deref())?.masked();

    match ctx.format.as_str() {
        "json" => print_json(&config)?,
        _ => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
