//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/qsan/config.toml)
//!
//! 环境变量 `QSAN_IP` / `QSAN_USERNAME` / `QSAN_PASSWORD` 优先于配置文件。

use anyhow::{Context, Result};
use qsan_client::{csi_scopes, ClientOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_HOST: &str = "QSAN_IP";
pub const ENV_USERNAME: &str = "QSAN_USERNAME";
pub const ENV_PASSWORD: &str = "QSAN_PASSWORD";

/// CLI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QsanConfig {
    /// 阵列连接
    #[serde(default)]
    pub array: ArrayConfig,

    /// 登录凭据
    #[serde(default)]
    pub auth: AuthConfig,
}

/// 阵列连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    /// 管理地址
    pub host: String,

    pub https: bool,

    /// 0 表示协议默认端口
    pub port: u16,

    /// 请求超时（秒）
    pub req_timeout: u64,

    /// 连接超时（秒）
    pub connect_timeout: u64,

    pub verify_ssl: bool,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        let options = ClientOptions::default();
        Self {
            host: String::new(),
            https: options.https,
            port: options.port,
            req_timeout: options.req_timeout,
            connect_timeout: options.connect_timeout,
            verify_ssl: options.verify_ssl,
        }
    }
}

/// scope 生成方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// 由密码派生 CSI scope
    #[default]
    Csi,

    /// 直接使用 `scopes` 字段
    Raw,
}

/// 登录凭据配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub scope_mode: ScopeMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
}

impl QsanConfig {
    /// 获取默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("qsan").join("config.toml"))
    }

    /// 加载配置并应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从指定路径加载，文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 保存配置
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("序列化配置失败")?;

        fs::write(path, content).with_context(|| format!("写入配置文件失败: {:?}", path))?;

        Ok(())
    }

    /// 使用环境变量覆盖配置文件中的值
    pub fn apply_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = get(ENV_HOST).filter(|v| !v.is_empty()) {
            self.array.host = host;
        }
        if let Some(username) = get(ENV_USERNAME).filter(|v| !v.is_empty()) {
            self.auth.username = username;
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.auth.password = password;
        }
    }

    /// 检查连接阵列所需的字段
    pub fn validate(&self) -> Result<()> {
        if self.array.host.trim().is_empty() {
            anyhow::bail!("未配置阵列地址，请设置 [array].host 或 {}", ENV_HOST);
        }
        if self.auth.username.is_empty() {
            anyhow::bail!("未配置用户名，请设置 [auth].username 或 {}", ENV_USERNAME);
        }
        if self.auth.scope_mode == ScopeMode::Raw && self.auth.scopes.is_none() {
            anyhow::bail!("scope_mode = \"raw\" 时必须设置 [auth].scopes");
        }
        Ok(())
    }

    /// 转换为客户端配置
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            https: self.array.https,
            port: self.array.port,
            req_timeout: self.array.req_timeout,
            connect_timeout: self.array.connect_timeout,
            verify_ssl: self.array.verify_ssl,
        }
    }

    /// 登录时使用的 scope
    pub fn scopes(&self) -> String {
        match self.auth.scope_mode {
            ScopeMode::Csi => csi_scopes(&self.auth.password),
            ScopeMode::Raw => self.auth.scopes.clone().unwrap_or_default(),
        }
    }

    /// 隐藏密码后的副本，用于显示
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.auth.password.is_empty() {
            masked.auth.password = "******".to_string();
        }
        if masked.auth.scopes.is_some() {
            masked.auth.scopes = Some("******".to_string());
        }
        masked
    }
}
