//! QSAN HTTP 传输层与未认证客户端
//!
//! [`Client`] 负责构造请求、发送请求以及登录换取令牌；
//! 带令牌的调用请使用 [`Client::get_auth_client`] 得到的 [`AuthClient`]。

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::auth::{AuthClient, Credentials, TokenPair};
use crate::error::{ErrorResponse, QsanError, Result};

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HTTPS_PORT: u16 = 443;

/// 登录接口路径
pub const LOGIN_PATH: &str = "/auth/get";

/// 刷新令牌接口路径
pub const REFRESH_PATH: &str = "/auth/refresh";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// QSAN 客户端配置
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// 是否使用 HTTPS
    pub https: bool,

    /// 端口，0 表示使用协议默认端口
    pub port: u16,

    /// 请求超时（秒），0 表示不限制
    pub req_timeout: u64,

    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 是否验证 SSL 证书
    ///
    /// 阵列通常使用自签名证书，默认不验证。
    pub verify_ssl: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            https: false,
            port: 0,
            req_timeout: 30,
            connect_timeout: 10,
            verify_ssl: false,
        }
    }
}

/// URL 协议
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// 阵列管理地址，构造后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: &str, options: &ClientOptions) -> Self {
        let (scheme, default_port) = if options.https {
            (Scheme::Https, DEFAULT_HTTPS_PORT)
        } else {
            (Scheme::Http, DEFAULT_HTTP_PORT)
        };
        let port = if options.port == 0 { default_port } else { options.port };

        Self {
            scheme,
            host: host.trim().to_string(),
            port,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`，IPv6 地址写成 `[host]:port`
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `scheme://host:port`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme.as_str(), self.authority())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// 空请求体，仍带表单 Content-Type
    Empty,

    /// `application/x-www-form-urlencoded` 键值对
    Form(Vec<(String, String)>),

    /// 已序列化的 JSON 原文
    Json(String),
}

/// 单次请求描述，按调用构造，不复用
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// 追加查询参数
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// 使用表单编码的请求体
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// 将 `body` 序列化为 JSON 请求体
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let raw = serde_json::to_string(body).map_err(QsanError::Encode)?;
        self.body = RequestBody::Json(raw);
        Ok(self)
    }

    /// 直接使用 JSON 原文作为请求体
    pub fn raw_json(mut self, raw: impl Into<String>) -> Self {
        self.body = RequestBody::Json(raw.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// QSAN 客户端（未认证）
#[derive(Debug, Clone)]
pub struct Client {
    /// 阵列地址
    endpoint: Endpoint,

    /// API 基础 URL
    base_url: Url,

    /// HTTP 客户端
    http_client: reqwest::Client,

    /// 取消令牌，取消后所有进行中的请求立即返回
    cancel: Option<CancellationToken>,
}

impl Client {
    /// 创建新的 QSAN 客户端
    pub fn new(host: &str, options: ClientOptions) -> Result<Self> {
        let endpoint = Endpoint::new(host, &options);
        let base = endpoint.base_url();
        let base_url = Url::parse(&base).map_err(|source| QsanError::InvalidUrl {
            url: base.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout))
            .danger_accept_invalid_certs(!options.verify_ssl);
        if options.req_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(options.req_timeout));
        }
        let http_client = builder.build().map_err(QsanError::Build)?;

        debug!("QSAN 客户端创建: {}", endpoint);

        Ok(Self {
            endpoint,
            base_url,
            http_client,
            cancel: None,
        })
    }

    /// 绑定取消令牌
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// 登录并返回带认证的客户端
    ///
    /// 凭据会保存在返回的客户端中，用于刷新令牌过期后的重新登录。
    pub async fn get_auth_client(&self, user: &str, password: &str, scopes: &str) -> Result<AuthClient> {
        let tokens = self.login(user, password, scopes).await.map_err(|e| {
            error!("QSAN 登录失败: {}", e);
            QsanError::auth(&Method::POST, &self.request_url(LOGIN_PATH), e)
        })?;

        info!("QSAN 登录成功: {}@{}", user, self.endpoint);

        Ok(AuthClient::new(
            self.clone(),
            Credentials::new(user, password, scopes),
            tokens,
        ))
    }

    /// 使用用户名、密码和 scope 换取令牌
    pub async fn login(&self, user: &str, password: &str, scopes: &str) -> Result<TokenPair> {
        info!("QSAN 客户端登录: {}", user);
        let req = ApiRequest::post(LOGIN_PATH).form([
            ("user", user),
            ("password", password),
            ("offlineAccess", "true"),
            ("scopes", scopes),
        ]);

        self.send_request(&req).await
    }

    /// 发送请求并解码响应（无令牌，不重试）
    pub async fn send_request<R: DeserializeOwned>(&self, req: &ApiRequest) -> Result<R> {
        let response = self.execute(req, None).await?;
        self.decode_response(req, response).await
    }

    /// 构造 HTTP 请求
    pub fn build(&self, req: &ApiRequest) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(req.path())
            .map_err(|source| QsanError::InvalidUrl {
                url: format!("{}{}", self.base_url, req.path()),
                source,
            })?;
        debug!("[build] {} url: {}", req.method(), url);

        let mut builder = self.http_client.request(req.method().clone(), url);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }

        let builder = match req.body() {
            RequestBody::Empty => builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE),
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Json(raw) => builder
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(raw.clone()),
        };

        Ok(builder)
    }

    /// 发送请求，返回原始响应；不解释状态码
    pub(crate) async fn execute(&self, req: &ApiRequest, token: Option<&str>) -> Result<Response> {
        let mut builder = self.build(req)?;
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.header(AUTHORIZATION, token);
        }

        let response = self.run(req, builder.send()).await?;
        debug!(
            "[execute] StatusCode: {} ({} {})",
            response.status().as_u16(),
            req.method(),
            self.request_url(req.path())
        );
        Ok(response)
    }

    /// 解码响应：200 解码为目标类型，其余状态解码错误信封
    pub(crate) async fn decode_response<R: DeserializeOwned>(
        &self,
        req: &ApiRequest,
        response: Response,
    ) -> Result<R> {
        let status = response.status();
        let body = self.run(req, response.bytes()).await?;

        if status != StatusCode::OK {
            return Err(match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(envelope) => {
                    warn!(
                        "API 请求失败: {} {}, StatusCode({}) {} ({})",
                        req.method(),
                        self.request_url(req.path()),
                        status.as_u16(),
                        envelope.error.message,
                        envelope.error.code
                    );
                    QsanError::Api {
                        method: req.method().clone(),
                        url: self.request_url(req.path()),
                        status: status.as_u16(),
                        code: envelope.error.code,
                        message: envelope.error.message,
                    }
                }
                Err(e) => {
                    warn!(
                        "API 请求失败: {} {}, StatusCode({}) 无法解析错误响应: {}",
                        req.method(),
                        self.request_url(req.path()),
                        status.as_u16(),
                        e
                    );
                    QsanError::Unknown {
                        method: req.method().clone(),
                        url: self.request_url(req.path()),
                        status: status.as_u16(),
                    }
                }
            });
        }

        serde_json::from_slice(&body).map_err(|source| {
            warn!(
                "响应解析失败: {} {}: {}",
                req.method(),
                self.request_url(req.path()),
                source
            );
            QsanError::Decode {
                method: req.method().clone(),
                url: self.request_url(req.path()),
                status: status.as_u16(),
                source,
            }
        })
    }

    /// `host:port/path`，用于错误信息
    pub(crate) fn request_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.authority(), path)
    }

    /// 执行网络操作，同时响应取消令牌
    async fn run<F, T>(&self, req: &ApiRequest, fut: F) -> Result<T>
    where
        F: Future<Output = reqwest::Result<T>>,
    {
        let result = match &self.cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        warn!("请求已取消: {} {}", req.method(), self.request_url(req.path()));
                        return Err(QsanError::Cancelled {
                            method: req.method().clone(),
                            url: self.request_url(req.path()),
                        });
                    }
                    res = fut => res,
                }
            }
            None => fut.await,
        };

        result.map_err(|source| {
            error!("[execute] {} {} err: {}", req.method(), self.request_url(req.path()), source);
            QsanError::Transport {
                method: req.method().clone(),
                url: self.request_url(req.path()),
                source,
            }
        })
    }
}
