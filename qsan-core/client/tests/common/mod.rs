//! 集成测试公共工具：模拟阵列与登录

#![allow(dead_code)]

use qsan_client::{AuthClient, Client, ClientOptions};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "1234";
pub const SCOPES: &str = "csi.readwrite|sV2YoKMUhA8ysrY4FL2f2Q==";

/// 登录 / 刷新接口的响应体
pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "expireTime": 3600,
        "refreshToken": refresh,
    })
}

/// 阵列错误信封
pub fn error_body(message: &str, code: i64) -> Value {
    json!({ "error": { "message": message, "code": code } })
}

/// 指向模拟阵列的未认证客户端
pub fn client_for(server: &MockServer) -> Client {
    let addr = server.address();
    Client::new(
        &addr.ip().to_string(),
        ClientOptions {
            port: addr.port(),
            req_timeout: 10,
            ..Default::default()
        },
    )
    .expect("创建客户端失败")
}

/// 登录接口返回指定令牌
pub fn login_mock(access: &str, refresh: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/auth/get"))
        .and(body_string_contains("user=admin"))
        .and(body_string_contains("offlineAccess=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
}

/// 挂载一次性登录（a1 / r1）并返回已认证客户端
pub async fn connect(server: &MockServer) -> AuthClient {
    login_mock("a1", "r1")
        .up_to_n_times(1)
        .expect(1)
        .named("initial login")
        .mount(server)
        .await;

    client_for(server)
        .get_auth_client(USER, PASSWORD, SCOPES)
        .await
        .expect("登录失败")
}
