//! QSAN 客户端错误定义

use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;

/// 阵列返回的已知错误码
///
/// 库本身不解释这些错误码，仅供调用方分支判断。
pub mod vendor_code {
    /// 卷不存在（HTTP 400）
    pub const VOLUME_NOT_FOUND: i64 = 10300;

    /// 卷尚未就绪，稍后重试（HTTP 409）
    pub const NOT_READY: i64 = 12002;

    /// 快照名称过长或快照不存在（HTTP 400）
    pub const INVALID_SNAPSHOT: i64 = 13502;

    /// 名称重复（HTTP 429）
    pub const DUPLICATE_NAME: i64 = 13514;
}

/// QSAN 客户端错误类型
///
/// 每个变体都带有请求方法与 URL，便于调用方定位失败的请求。
#[derive(Error, Debug)]
pub enum QsanError {
    #[error("[{method} {url}] 传输错误: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{method} {url}] 请求已取消")]
    Cancelled { method: Method, url: String },

    #[error("[{method} {url}] status {status}: {message} ({code})")]
    Api {
        method: Method,
        url: String,
        status: u16,
        code: i64,
        message: String,
    },

    #[error("[{method} {url}] status {status}: 响应解析失败: {source}")]
    Decode {
        method: Method,
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("[{method} {url}] unknown error, status code: {status}")]
    Unknown {
        method: Method,
        url: String,
        status: u16,
    },

    #[error("[{method} {url}] 认证失败: {source}")]
    Auth {
        method: Method,
        url: String,
        #[source]
        source: Box<QsanError>,
    },

    #[error("无效的请求地址 {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("请求体序列化失败: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("HTTP 客户端初始化失败: {0}")]
    Build(#[source] reqwest::Error),
}

impl QsanError {
    /// HTTP 状态码（传输层错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            QsanError::Api { status, .. }
            | QsanError::Decode { status, .. }
            | QsanError::Unknown { status, .. } => Some(*status),
            QsanError::Auth { source, .. } => source.status(),
            _ => None,
        }
    }

    /// 阵列返回的错误码
    pub fn vendor_code(&self) -> Option<i64> {
        match self {
            QsanError::Api { code, .. } => Some(*code),
            QsanError::Auth { source, .. } => source.vendor_code(),
            _ => None,
        }
    }

    /// 阵列返回的错误信息
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            QsanError::Api { message, .. } => Some(message),
            QsanError::Auth { source, .. } => source.vendor_message(),
            _ => None,
        }
    }

    /// 是否为指定状态码与错误码的阵列错误
    pub fn is_vendor(&self, status: u16, code: i64) -> bool {
        self.status() == Some(status) && self.vendor_code() == Some(code)
    }

    pub(crate) fn auth(method: &Method, url: &str, source: QsanError) -> Self {
        QsanError::Auth {
            method: method.clone(),
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

/// 非 200 响应的错误信封 `{"error": {"message": ..., "code": ...}}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    pub code: i64,
}

/// QSAN 客户端结果类型
pub type Result<T> = std::result::Result<T, QsanError>;
