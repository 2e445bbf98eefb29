//! 带认证的 QSAN 客户端
//!
//! 每次调用都会附带访问令牌。收到 401 时按以下规则恢复，且每次调用最多重试一次：
//!
//! 1. 普通请求收到 401：使用刷新令牌换取新的访问令牌，然后重新发送原请求一次。
//! 2. 刷新接口本身收到 401（刷新令牌也已过期）：使用保存的凭据重新登录，
//!    同时替换访问令牌和刷新令牌，不再重发任何请求。
//!
//! 令牌刷新是 single-flight 的：并发收到 401 的调用共享同一次刷新结果。

use std::any::Any;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, trace};

use crate::api::{PoolOp, TargetOp, VolumeOp};
use crate::client::{ApiRequest, Client, Endpoint, REFRESH_PATH};
use crate::error::{QsanError, Result};

/// 登录或刷新接口返回的令牌
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,

    /// 访问令牌有效期提示（秒）
    #[serde(default)]
    pub expire_time: i64,

    #[serde(default)]
    pub refresh_token: String,
}

/// 登录凭据，仅用于刷新令牌过期后的重新登录
#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
    scopes: String,
}

impl Credentials {
    pub fn new(user: &str, password: &str, scopes: &str) -> Self {
        Self {
            user: user.to_string(),
            password: password.to_string(),
            scopes: scopes.to_string(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("scopes", &"***")
            .finish()
    }
}

/// QSAN 客户端（已认证）
pub struct AuthClient {
    /// 传输层
    client: Client,

    /// 登录凭据
    credentials: Credentials,

    /// 当前令牌
    tokens: Arc<RwLock<TokenPair>>,

    /// 令牌恢复闸门，同一时刻只允许一次刷新或重新登录
    refresh_gate: Mutex<()>,
}

impl AuthClient {
    pub(crate) fn new(client: Client, credentials: Credentials, tokens: TokenPair) -> Self {
        Self {
            client,
            credentials,
            tokens: Arc::new(RwLock::new(tokens)),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    /// 当前令牌的快照
    pub async fn tokens(&self) -> TokenPair {
        self.tokens.read().await.clone()
    }

    /// 获取存储池 API
    pub fn pool(&self) -> PoolOp<'_> {
        PoolOp::new(self)
    }

    /// 获取卷管理 API
    pub fn volume(&self) -> VolumeOp<'_> {
        VolumeOp::new(self)
    }

    /// 获取 Target / LUN 管理 API
    pub fn target(&self) -> TargetOp<'_> {
        TargetOp::new(self)
    }

    /// 发送请求并解码响应，访问令牌过期时自动恢复并重试一次
    ///
    /// 刷新接口本身返回 401 时会重新登录；此时若 `R` 是 [`TokenPair`]，
    /// 返回新令牌，否则新令牌只保存在客户端内部，返回 `R::default()`。
    pub async fn send_request<R>(&self, req: &ApiRequest) -> Result<R>
    where
        R: DeserializeOwned + Default + 'static,
    {
        let used_token = self.tokens.read().await.access_token.clone();
        let response = self.client.execute(req, Some(&used_token)).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return self.client.decode_response(req, response).await;
        }
        drop(response);

        if req.path() != REFRESH_PATH {
            // 访问令牌过期，刷新后重发一次
            debug!(
                "[send_request] 生成新的访问令牌 ({} {})",
                req.method(),
                self.client.request_url(req.path())
            );
            self.renew_access_token(&used_token)
                .await
                .map_err(|e| QsanError::auth(req.method(), &self.client.request_url(req.path()), e))?;

            debug!(
                "[send_request] 重新发送请求 ({} {})",
                req.method(),
                self.client.request_url(req.path())
            );
            let token = self.tokens.read().await.access_token.clone();
            let response = self.client.execute(req, Some(&token)).await?;
            return self.client.decode_response(req, response).await;
        }

        // 刷新令牌过期，重新登录
        let tokens = {
            let _gate = self.refresh_gate.lock().await;
            self.relogin()
                .await
                .map_err(|e| QsanError::auth(req.method(), &self.client.request_url(req.path()), e))?
        };

        let boxed: Box<dyn Any> = Box::new(tokens);
        match boxed.downcast::<R>() {
            Ok(tokens) => Ok(*tokens),
            Err(_) => {
                error!(
                    "[send_request] 重新登录后的令牌无法写入返回值，仅保存在客户端内部 ({} {})",
                    req.method(),
                    self.client.request_url(req.path())
                );
                Ok(R::default())
            }
        }
    }

    /// 使用刷新令牌换取新的访问令牌，并保存到客户端
    ///
    /// 刷新接口返回 401 时改为重新登录，访问令牌和刷新令牌都会被替换。
    /// 与自动恢复共用刷新闸门。
    pub async fn gen_access_token(&self, refresh_token: &str) -> Result<TokenPair> {
        let _gate = self.refresh_gate.lock().await;
        let renewed = self.request_access_token(refresh_token).await?;
        self.store_access_token(&renewed).await;
        Ok(renewed)
    }

    /// 调用刷新接口，调用方需持有刷新闸门
    async fn request_access_token(&self, refresh_token: &str) -> Result<TokenPair> {
        let req = ApiRequest::post(REFRESH_PATH).form([("refreshToken", refresh_token)]);
        let access_token = self.tokens.read().await.access_token.clone();
        let response = self.client.execute(&req, Some(&access_token)).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            drop(response);
            debug!("[request_access_token] 刷新令牌已过期");
            return self.relogin().await;
        }

        self.client.decode_response(&req, response).await
    }

    /// 替换访问令牌，刷新令牌保持不变
    async fn store_access_token(&self, renewed: &TokenPair) {
        let mut tokens = self.tokens.write().await;
        tokens.access_token = renewed.access_token.clone();
        tokens.expire_time = renewed.expire_time;
        trace!("[store_access_token] 新访问令牌: {}", tokens.access_token);
    }

    /// 在刷新闸门内更新访问令牌
    ///
    /// 如果等待闸门期间其他调用已经替换了被拒绝的令牌，直接复用新令牌。
    async fn renew_access_token(&self, rejected: &str) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        let refresh_token = {
            let tokens = self.tokens.read().await;
            if tokens.access_token != rejected {
                debug!("[renew_access_token] 访问令牌已被并发请求刷新");
                return Ok(());
            }
            tokens.refresh_token.clone()
        };

        let renewed = self.request_access_token(&refresh_token).await?;
        self.store_access_token(&renewed).await;
        Ok(())
    }

    /// 使用保存的凭据重新登录，替换访问令牌和刷新令牌
    async fn relogin(&self) -> Result<TokenPair> {
        info!("重新获取访问令牌和刷新令牌: {}", self.credentials.user());
        let renewed = self
            .client
            .login(
                &self.credentials.user,
                &self.credentials.password,
                &self.credentials.scopes,
            )
            .await?;

        *self.tokens.write().await = renewed.clone();
        Ok(renewed)
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("endpoint", self.client.endpoint())
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_decode() {
        let body = r#"{"accessToken":"a1","expireTime":3600,"refreshToken":"r1"}"#;
        let tokens: TokenPair = serde_json::from_str(body).unwrap();
        assert_eq!(tokens.access_token, "a1");
        assert_eq!(tokens.expire_time, 3600);
        assert_eq!(tokens.refresh_token, "r1");
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = Credentials::new("admin", "secret", "csi.readwrite|abc");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("admin"));
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("abc"));
    }
}
