#![cfg(feature = "web-api")]

mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use common::MockBackend;
use serde_json::{json, Value};
use ursp_editor::models::AppState;
use ursp_editor::web_handlers::interfaces;
use ursp_editor::Settings;

fn state(backend: MockBackend) -> web::Data<Arc<AppState<MockBackend>>> {
    let settings = Settings {
        submit_cooldown_ms: 0,
        ..Settings::default()
    };
    web::Data::new(Arc::new(AppState::new(Arc::new(settings), backend)))
}

#[actix_web::test]
async fn test_index_serves_editor_page() {
    let app = test::init_service(
        App::new()
            .app_data(state(MockBackend::new()))
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"id="ursp-container""#));
    assert!(body.contains(r#"name="ursp-0-pv""#));
}

#[actix_web::test]
async fn test_actions_update_shared_store() {
    let data = state(MockBackend::new());
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/editor/action")
        .set_json(json!({"action": "set-rule-count", "count": 3}))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["rule_count"], 3);
    assert_eq!(reply["rerender"], "immediate");
    assert!(reply["markup"].as_str().unwrap().contains("URSP Rule 2"));

    let req = test::TestRequest::post()
        .uri("/editor/action")
        .set_json(json!({
            "binding": {"action": "set-content-count", "rule": 2, "descriptor": 0},
            "value": "2"
        }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["rerender"], "deferred");
    assert_eq!(
        data.with_store(|store| store.contents(2, 0).map(|c| c.len())),
        Some(2)
    );

    let req = test::TestRequest::post()
        .uri("/editor/action")
        .set_json(json!({"action": "set-descriptor-count", "rule": 7, "count": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_capability_toggle_only_updates_count() {
    let data = state(MockBackend::new());
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/editor/action")
        .set_json(json!({"action": "set-descriptor-type", "rule": 0, "value": "Connection capabilities"}))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["rerender"], "immediate");

    let req = test::TestRequest::post()
        .uri("/editor/action")
        .set_json(json!({
            "binding": {"action": "toggle-capability", "rule": 0, "capability": "MMS"},
            "value": "MMS"
        }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["rerender"], "count-only");
    assert!(reply["markup"].as_str().unwrap().contains("(3 selected)"));
    assert_eq!(
        data.with_store(|store| store.rule(0).map(|r| r.traffic_value.clone())),
        Some("IMS, SUPL, Internet".to_string())
    );
}

#[actix_web::test]
async fn test_encode_validates_then_forwards() {
    let data = state(MockBackend::new());
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/editor/encode")
        .set_json(json!({
            "pti": "151", "plmn": "45006F", "upsc": "2",
            "fields": {"ursp-0-pv": {"value": ""}}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let reply: Value = test::read_body_json(resp).await;
    assert_eq!(reply["message"], "URSP Rule 0: Precedence Value is required");
    assert_eq!(data.backend.encode_calls(), 0);

    let req = test::TestRequest::post()
        .uri("/editor/encode")
        .set_json(json!({
            "pti": "151", "plmn": "45006F", "upsc": "2",
            "fields": {
                "ursp-0-pv": {"value": "1"},
                "rsd-0-0-pv": {"value": "1"},
                "rsd-0-0-0-val": {"value": "1"}
            }
        }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["success"], true);
    assert_eq!(reply["message"], "Encoding completed successfully!");
    assert!(reply["results_html"]
        .as_str()
        .unwrap()
        .contains("SIM EF_URSP"));
    assert_eq!(data.backend.encode_calls(), 1);
    assert_eq!(
        data.backend.last_encode().unwrap().sections.rsd_conts[0][0][0].2,
        "1"
    );
}

#[actix_web::test]
async fn test_rejected_encode_maps_to_422() {
    let app = test::init_service(
        App::new()
            .app_data(state(MockBackend::rejecting("Invalid PLMN")))
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/editor/encode")
        .set_json(json!({
            "pti": "151", "plmn": "zz", "upsc": "2",
            "fields": {"rsd-0-0-0-val": {"value": "1"}}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let reply: Value = test::read_body_json(resp).await;
    assert_eq!(reply["success"], false);
    assert_eq!(reply["message"], "Error: Invalid PLMN");
}

#[actix_web::test]
async fn test_decode_returns_text_result() {
    let app = test::init_service(
        App::new()
            .app_data(state(MockBackend::new()))
            .configure(interfaces::config::<MockBackend>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/editor/decode")
        .set_json(json!({"log_text": "7E 00 68"}))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["message"], "Decoding completed successfully!");
    assert_eq!(
        reply["result_text"],
        "UE policy container type: UE STATE INDICATION"
    );
}
