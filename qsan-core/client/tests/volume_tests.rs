//! 卷管理集成测试

mod common;

use common::{connect, error_body};
use qsan_client::{
    vendor_code, SnapshotMutableSetting, VolumeCreateOptions, VolumeModifyOptions, VolumeQosOptions,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VOLUMES: &str = "/rest/v2/storage/block/volumes";
const SNAPSHOT_TARGETS: &str = "/rest/v2/backup/snapshot/targets";

fn volume_body(id: &str, name: &str, size: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "poolId": "1",
        "lunId": null,
        "online": true,
        "health": "GOOD",
        "state": "ONLINE",
        "provision": "THIN",
        "totalSize": size,
        "usedSize": 0,
        "blockSize": 4096,
        "cacheMode": "WRITE_BACK",
        "tags": { "wwn": "6001", "type": "RAID" }
    })
}

#[tokio::test]
async fn test_volume_lifecycle() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let vol_path = format!("{}/2074967409", VOLUMES);

    Mock::given(method("POST"))
        .and(path(VOLUMES))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "name": "v1", "totalSize": 10240, "poolId": "1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("2074967409", "v1", 10240)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(vol_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(vol_path.as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body("Volume not found", 10300)))
        .expect(1)
        .mount(&server)
        .await;

    let volume = auth
        .volume()
        .create_volume("1", "v1", 10240, &VolumeCreateOptions::default())
        .await
        .unwrap();
    assert_eq!(volume.id, "2074967409");
    assert_eq!(volume.total_size, 10240);
    assert_eq!(volume.tags.wwn, "6001");
    assert!(volume.lun_id.is_null());

    auth.volume().delete_volume(&volume.id).await.unwrap();

    let err = auth.volume().list_volume_by_id(&volume.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.vendor_code(), Some(vendor_code::VOLUME_NOT_FOUND));
}

#[tokio::test]
async fn test_delete_volume_twice() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let vol_path = format!("{}/7", VOLUMES);

    Mock::given(method("DELETE"))
        .and(path(vol_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(vol_path.as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("Volume not found", 10300)))
        .expect(1)
        .mount(&server)
        .await;

    auth.volume().delete_volume("7").await.unwrap();
    let err = auth.volume().delete_volume("7").await.unwrap_err();
    assert!(err.is_vendor(400, vendor_code::VOLUME_NOT_FOUND), "{:?}", err);
}

#[tokio::test]
async fn test_create_volume_with_long_name() {
    // 阵列对超长名称返回的错误码原样透传
    const NAME_TOO_LONG: i64 = 10307;

    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let name = "v".repeat(64);

    Mock::given(method("POST"))
        .and(path(VOLUMES))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(error_body("Name length exceeds limit", NAME_TOO_LONG)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = auth
        .volume()
        .create_volume("1", &name, 10240, &VolumeCreateOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_vendor(400, NAME_TOO_LONG));
    assert_eq!(err.vendor_message(), Some("Name length exceeds limit"));
}

#[tokio::test]
async fn test_create_volume_options_are_sent() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(VOLUMES))
        .and(body_partial_json(json!({
            "name": "v2",
            "blockSize": 4096,
            "ioPriority": "HIGH",
            "enableReadAhead": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("8", "v2", 2048)))
        .expect(1)
        .mount(&server)
        .await;

    let options = VolumeCreateOptions {
        block_size: Some(4096),
        io_priority: Some("HIGH".to_string()),
        enable_read_ahead: Some(false),
        ..Default::default()
    };
    let volume = auth.volume().create_volume("1", "v2", 2048, &options).await.unwrap();
    assert_eq!(volume.id, "8");
}

#[tokio::test]
async fn test_list_volumes_by_pool_id() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(VOLUMES))
        .and(query_param("q", "poolId='1'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            volume_body("7", "v1", 10240),
            volume_body("8", "v2", 2048)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let volumes = auth.volume().list_volumes_by_pool_id("1").await.unwrap();
    let ids: Vec<&str> = volumes.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["7", "8"]);
}

#[tokio::test]
async fn test_modify_volume_sends_only_set_fields() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/7", VOLUMES).as_str()))
        .and(body_json(json!({
            "name": "afterMod",
            "totalSize": 20480,
            "ioPriority": "HIGH",
            "targetResponseTime": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("7", "afterMod", 20480)))
        .expect(1)
        .mount(&server)
        .await;

    let options = VolumeModifyOptions {
        name: Some("afterMod".to_string()),
        total_size: Some(20480),
        qos: VolumeQosOptions {
            io_priority: Some("HIGH".to_string()),
            target_response_time: Some(200),
            ..Default::default()
        },
        ..Default::default()
    };
    let volume = auth.volume().modify_volume("7", &options).await.unwrap();
    assert_eq!(volume.name, "afterMod");
    assert_eq!(volume.total_size, 20480);
}

#[tokio::test]
async fn test_clone_volume() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{}/7/clone", VOLUMES).as_str()))
        .and(body_json(json!({ "name": "v1-clone", "poolId": "2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "9",
            "name": "v1-clone",
            "poolId": "2",
            "state": "CLONING",
            "progress": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let volume = auth.volume().clone_volume("7", "v1-clone", "2").await.unwrap();
    assert_eq!(volume.state, "CLONING");
    assert_eq!(volume.progress, 10);
}

#[tokio::test]
async fn test_volume_not_ready_code() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/9", VOLUMES).as_str()))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body("Volume is busy", 12002)))
        .mount(&server)
        .await;

    let err = auth.volume().delete_volume("9").await.unwrap_err();
    assert!(err.is_vendor(409, vendor_code::NOT_READY));
}

#[tokio::test]
async fn test_metadata_round_trip_through_volume() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let vol_path = format!("{}/7", VOLUMES);
    let content = br#"{"pvc":"data-0"}"#;

    let mut stored = volume_body("7", "v1", 10240);
    stored["metadata"] = json!({
        "status": "VALID",
        "type": "CSI Driver",
        "content": "eyJwdmMiOiJkYXRhLTAifQ=="
    });

    Mock::given(method("PATCH"))
        .and(path(vol_path.as_str()))
        .and(body_json(json!({
            "metadata": {
                "status": "VALID",
                "type": "CSI Driver",
                "content": "eyJwdmMiOiJkYXRhLTAifQ=="
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(vol_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&server)
        .await;

    let saved = auth
        .volume()
        .set_metadata("7", "VALID", "CSI Driver", content)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.kind, "CSI Driver");

    let loaded = auth.volume().get_metadata("7").await.unwrap().unwrap();
    assert_eq!(loaded.content_bytes().unwrap(), content.to_vec());
}

#[tokio::test]
async fn test_volume_without_metadata() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/8", VOLUMES).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("8", "v2", 2048)))
        .mount(&server)
        .await;

    assert!(auth.volume().get_metadata("8").await.unwrap().is_none());
}

#[tokio::test]
async fn test_global_qos() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/storage/qos/volumes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "enableQos": true, "qosRule": "IO_PRIORITY" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v2/storage/qos/volumes"))
        .and(body_json(json!({ "enableQos": false, "qosRule": "IO_PRIORITY" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enableQos": false, "qosRule": "NONE" })))
        .expect(1)
        .mount(&server)
        .await;

    let qos = auth.volume().get_qos().await.unwrap();
    assert!(qos.enable_qos);
    assert_eq!(qos.qos_rule, "IO_PRIORITY");

    // 关闭后规则被阵列置为 NONE
    let qos = auth.volume().set_qos(false, "IO_PRIORITY").await.unwrap();
    assert!(!qos.enable_qos);
    assert_eq!(qos.qos_rule, "NONE");
}

#[tokio::test]
async fn test_snapshot_workflow() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let target = format!("{}/7", SNAPSHOT_TARGETS);
    let snapshots = format!("{}/snapshots", target);

    Mock::given(method("GET"))
        .and(path(target.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 0, "usedSize": 0, "minimumSize": 2048
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(target.as_str()))
        .and(body_json(json!({ "totalSize": 4096 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 4096, "usedSize": 0, "minimumSize": 2048
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(snapshots.as_str()))
        .and(body_json(json!({ "name": "snap-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "3", "name": "snap-1", "status": "ACTIVE", "usedSize": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(snapshots.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "3", "name": "snap-1", "status": "ACTIVE" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/3/rollback", snapshots).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/3", snapshots).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(snapshots.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let volumes = auth.volume();

    let setting = volumes.get_snapshot_setting("7").await.unwrap();
    assert_eq!(setting.minimum_size, 2048);

    let setting = volumes
        .set_snapshot_setting("7", &SnapshotMutableSetting { total_size: 4096 })
        .await
        .unwrap();
    assert_eq!(setting.total_size, 4096);

    let snap = volumes.create_snapshot("7", "snap-1").await.unwrap();
    assert_eq!(snap.id, "3");

    let listed = volumes.list_snapshots("7").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "snap-1");

    volumes.rollback_snapshot("7", "3").await.unwrap();
    volumes.delete_snapshot("7", "3").await.unwrap();
    volumes.delete_all_snapshots("7").await.unwrap();
}

#[tokio::test]
async fn test_snapshot_vendor_errors() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;
    let snapshots = format!("{}/7/snapshots", SNAPSHOT_TARGETS);

    Mock::given(method("POST"))
        .and(path(snapshots.as_str()))
        .and(body_partial_json(json!({ "name": "dup" })))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body("Name is duplicated", 13514)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/99", snapshots).as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("Invalid snapshot", 13502)))
        .mount(&server)
        .await;

    let err = auth.volume().create_snapshot("7", "dup").await.unwrap_err();
    assert!(err.is_vendor(429, vendor_code::DUPLICATE_NAME));

    let err = auth.volume().get_snapshot("7", "99").await.unwrap_err();
    assert!(err.is_vendor(400, vendor_code::INVALID_SNAPSHOT));
}
