//! Target / LUN 与存储池集成测试

mod common;

use common::{connect, error_body};
use qsan_client::{CreateTargetParam, Host, Iscsi, LunMapParam, LunPatchParam, TargetType};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGETS: &str = "/rest/v2/dataTransfer/targets";

#[tokio::test]
async fn test_target_lun_lifecycle() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(TARGETS))
        .and(body_json(json!({
            "name": "tgt-1",
            "type": "iSCSI",
            "iscsi": [{ "eths": ["c0e1"] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1",
            "name": "tgt-1",
            "type": "iSCSI",
            "iscsi": [{ "iqn": "iqn.2004-08.com.qsan:xs5226-000d4001c:dev0.ctr1", "name": "tgt-1", "eths": ["c0e1"] }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/t1/luns", TARGETS).as_str()))
        .and(body_json(json!({ "volumeId": "7", "hosts": [{ "name": "*" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "l1",
            "name": "0",
            "volumeId": "7",
            "hosts": [{ "name": "*", "rule": "RW" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/t1/luns/l1", TARGETS).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/t1", TARGETS).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let targets = auth.target();

    let target = targets
        .create_target(&CreateTargetParam {
            name: "tgt-1".to_string(),
            target_type: TargetType::Iscsi,
            iscsis: vec![Iscsi {
                eths: vec!["c0e1".to_string()],
                ..Default::default()
            }],
        })
        .await
        .unwrap();
    assert_eq!(target.id, "t1");
    assert_eq!(target.target_type, "iSCSI");
    assert!(target.iscsi[0].iqn.starts_with("iqn.2004-08.com.qsan"));

    let lun = targets
        .map_lun(
            &target.id,
            &LunMapParam {
                volume_id: "7".to_string(),
                hosts: vec![Host::any()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(lun.volume_id, "7");
    assert_eq!(lun.hosts[0].name, "*");

    targets.unmap_lun(&target.id, &lun.id).await.unwrap();
    targets.delete_target(&target.id).await.unwrap();
}

#[tokio::test]
async fn test_find_target_by_name() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(TARGETS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "t1", "name": "tgt-1", "type": "iSCSI" },
            { "id": "t2", "name": "tgt-fc", "type": "FCP", "fcp": [{ "wwn": "20:00:00:11" }] }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let found = auth.target().find_target_by_name("tgt-fc").await.unwrap().unwrap();
    assert_eq!(found.id, "t2");
    assert_eq!(found.fcp[0].wwn, "20:00:00:11");

    assert!(auth.target().find_target_by_name("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_patch_target_lun_hosts() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/t1/luns/l1", TARGETS).as_str()))
        .and(body_json(json!({ "hosts": [{ "name": "iqn.1993-08.org.debian:01:host1" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "l1",
            "volumeId": "7",
            "hosts": [{ "name": "iqn.1993-08.org.debian:01:host1", "rule": "RW" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/t1/luns", TARGETS).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "l1", "volumeId": "7" },
            { "id": "l2", "volumeId": "8" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let lun = auth
        .target()
        .patch_target_lun(
            "t1",
            "l1",
            &LunPatchParam {
                hosts: vec![Host::new("iqn.1993-08.org.debian:01:host1")],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(lun.hosts.len(), 1);

    let luns = auth.target().list_all_luns("t1").await.unwrap();
    assert_eq!(luns.len(), 2);
    assert_eq!(luns[1].volume_id, "8");
}

#[tokio::test]
async fn test_map_lun_on_missing_target() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{}/nope/luns", TARGETS).as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body("Target not found", 10500)))
        .mount(&server)
        .await;

    let err = auth
        .target()
        .map_lun(
            "nope",
            &LunMapParam {
                volume_id: "7".to_string(),
                hosts: vec![Host::any()],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.vendor_message(), Some("Target not found"));
}

#[tokio::test]
async fn test_list_fibre_channel_ports() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/dataTransfer/protocol/fibreChannel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "fc0",
            "linkSpeed": 16,
            "supportSpeed": [8, 16, 32],
            "topology": "POINT_TO_POINT",
            "wwnn": "20:00:00:11:22:33:44:55",
            "wwpn": "21:00:00:11:22:33:44:55",
            "errCounter": { "signalLoss": 1, "syncLoss": 0, "linkFailure": 0, "invalidCRC": 0 }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let ports = auth.target().list_fc().await.unwrap();
    assert_eq!(ports[0].topology, "POINT_TO_POINT");
    assert_eq!(ports[0].err_counter.signal_loss, 1);
}

#[tokio::test]
async fn test_pool_queries() {
    let server = MockServer::start().await;
    let auth = connect(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/storage/pools/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "name": "pool-1",
            "provision": "THICK",
            "autoTiering": false,
            "raidLevel": "RAID5",
            "numOfVolumes": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pool = auth.pool().list_pool_by_id("1").await.unwrap();
    assert_eq!(pool.raid_level, "RAID5");
    assert_eq!(pool.num_of_volumes, 3);
}
