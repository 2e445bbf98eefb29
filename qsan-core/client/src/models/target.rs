//! Target、LUN 与光纤通道端口模型

use serde::{Deserialize, Serialize};

/// Target 类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    #[serde(rename = "iSCSI")]
    Iscsi,

    #[serde(rename = "FCP")]
    Fcp,
}

/// iSCSI 端口组参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct Iscsi {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// 网口，如 `c0e1`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub eths: Vec<String>,
}

/// 创建 Target 参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTargetParam {
    pub name: String,

    #[serde(rename = "type")]
    pub target_type: TargetType,

    #[serde(rename = "iscsi", skip_serializing_if = "Vec::is_empty")]
    pub iscsis: Vec<Iscsi>,
}

/// 修改 Target 参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchTargetParam {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,

    #[serde(rename = "iscsi", skip_serializing_if = "Vec::is_empty")]
    pub iscsis: Vec<Iscsi>,
}

/// 主机访问列表项，`name` 为 iqn / WWN，`*` 表示允许所有主机
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    pub name: String,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 允许所有主机访问
    pub fn any() -> Self {
        Self::new("*")
    }
}

/// LUN 映射参数
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunMapParam {
    /// LUN 编号，0 ~ 254
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub volume_id: String,

    pub hosts: Vec<Host>,
}

/// 修改 LUN 参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct LunPatchParam {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<Host>,
}

/// Target 信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetData {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub target_type: String,

    pub fcp: Vec<FcpInfo>,
    pub iscsi: Vec<IscsiInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcpInfo {
    pub wwn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IscsiInfo {
    pub iqn: String,
    pub name: String,
    pub alias: serde_json::Value,
    pub eths: Vec<String>,
}

/// LUN 信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LunData {
    pub id: String,
    pub name: String,
    pub volume_id: String,
    pub hosts: Vec<LunHost>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LunHost {
    pub name: String,
    pub rule: String,
}

/// 光纤通道端口信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FcData {
    pub id: String,
    pub link_speed: i64,
    pub support_speed: Vec<i64>,
    pub topology: String,
    pub wwnn: String,
    pub wwpn: String,
    pub err_counter: FcErrCounter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcErrCounter {
    #[serde(rename = "signalLoss")]
    pub signal_loss: i64,
    #[serde(rename = "syncLoss")]
    pub sync_loss: i64,
    #[serde(rename = "linkFailure")]
    pub link_failure: i64,
    #[serde(rename = "invalidCRC")]
    pub invalid_crc: i64,
}
