mod common;

use common::scan_form;
use ursp_editor::backend::{DecodeResponse, EncodedRules};
use ursp_editor::constants::element_ids;
use ursp_editor::models::{
    Capability, ContentType, FieldPath, Limits, RuleStore, TrafficDescriptorType,
};
use ursp_editor::template::{render_page, render_results, render_rules, PageContext, ResultView};
use ursp_editor::view::{sync_from_view, FieldState};
use ursp_editor::Settings;

/// Two rules, two descriptors on the second, mixed content types
fn populated_store() -> RuleStore {
    let mut store = RuleStore::new();
    store.set_rule_count(2);

    store
        .set_descriptor_type(0, TrafficDescriptorType::ConnectionCapabilities)
        .unwrap();
    store.toggle_capability(0, Capability::Supl).unwrap();
    store.set_content_count(0, 0, 2).unwrap();
    store.set_content_type(0, 0, 0, ContentType::SNssai).unwrap();
    store
        .set_content_type(0, 0, 1, ContentType::MultiAccessPreference)
        .unwrap();
    store
        .set_field(
            FieldPath::ContentValue {
                rule: 0,
                descriptor: 0,
                content: 0,
            },
            "SST 2 + SD 3",
        )
        .unwrap();

    store
        .set_descriptor_type(1, TrafficDescriptorType::OsAppId)
        .unwrap();
    store.set_descriptor_count(1, 2).unwrap();
    store.set_content_count(1, 1, 3).unwrap();
    store.set_content_type(1, 1, 0, ContentType::Dnn).unwrap();
    store.set_content_type(1, 1, 2, ContentType::Rsn).unwrap();
    let values = [
        (FieldPath::ContentValue { rule: 1, descriptor: 0, content: 0 }, "1"),
        (FieldPath::ContentValue { rule: 1, descriptor: 1, content: 0 }, "ims<&>\"quoted\""),
        (FieldPath::ContentValue { rule: 1, descriptor: 1, content: 1 }, "2"),
        (FieldPath::ContentValue { rule: 1, descriptor: 1, content: 2 }, "1"),
        (FieldPath::DescriptorPrecedence { rule: 1, descriptor: 1 }, "7"),
        (FieldPath::RulePrecedence { rule: 1 }, "12"),
    ];
    for (path, value) in values {
        store.set_field(path, value).unwrap();
    }
    store
}

#[test]
fn test_render_sync_round_trip() {
    let store = populated_store();
    let markup = render_rules(&store).unwrap();
    let form = scan_form(&markup);

    let mut synced = store.clone();
    let report = sync_from_view(&mut synced, &form);
    assert_eq!(report.skipped, 0);
    assert_eq!(synced.sections(), store.sections());
}

#[test]
fn test_sync_picks_up_edits() {
    let store = populated_store();
    let mut form = scan_form(&render_rules(&store).unwrap());
    form.insert(
        FieldPath::TrafficValue { rule: 1 },
        FieldState::enabled("Android/com.example.app"),
    );
    form.insert(
        FieldPath::RulePrecedence { rule: 0 },
        FieldState::enabled(""),
    );

    let mut synced = store.clone();
    sync_from_view(&mut synced, &form);
    let sections = synced.sections();
    assert_eq!(sections.ursp_sum[1].3, "Android/com.example.app");
    assert_eq!(sections.ursp_sum[0].1, "");
}

#[test]
fn test_render_is_idempotent() {
    let store = populated_store();
    assert_eq!(render_rules(&store).unwrap(), render_rules(&store).unwrap());
}

#[test]
fn test_locked_fields_render_disabled() {
    let store = populated_store();
    let markup = render_rules(&store).unwrap();

    assert!(markup.contains(r#"name="rsd-0-0-1-val" value="-" disabled placeholder="-""#));
    assert!(markup.contains(r#"name="rsd-0-0-0-val" value="SST 2 + SD 3" placeholder="Enter value""#));

    let fresh = render_rules(&RuleStore::new()).unwrap();
    assert!(fresh.contains(r#"name="ursp-0-td" value="-" disabled"#));
}

#[test]
fn test_selected_options_follow_store() {
    let markup = render_rules(&populated_store()).unwrap();
    assert!(markup.contains(r#"<option value="Connection capabilities" selected>"#));
    assert!(markup.contains(r#"<option value="OS Id + OS App Id" selected>"#));
    assert!(markup.contains(r#"<option value="Multi-access preference" selected>"#));
    assert!(markup.contains(r#"<option value="RSN" selected>"#));
}

#[test]
fn test_capability_widget() {
    let mut store = RuleStore::new();
    store
        .set_descriptor_type(0, TrafficDescriptorType::ConnectionCapabilities)
        .unwrap();
    let markup = render_rules(&store).unwrap();
    assert!(markup.contains("(4 selected)"));
    assert_eq!(markup.matches(" checked>").count(), 4);
    assert!(!markup.contains(r#"name="ursp-0-td""#));

    store.toggle_capability(0, Capability::Mms).unwrap();
    let markup = render_rules(&store).unwrap();
    assert!(markup.contains("(3 selected)"));
    assert_eq!(markup.matches(" checked>").count(), 3);
    assert!(markup.contains(r#"data-capability="MMS">"#));
}

#[test]
fn test_counts_and_ids_render() {
    let markup = render_rules(&populated_store()).unwrap();
    assert!(markup.contains("URSP Rule 1"));
    assert!(markup.contains("RSD 1_1"));
    assert!(markup.contains("RSD Type 1_1_2"));
    assert!(markup.contains(
        r#"value="3" min="1" max="5" data-action="set-content-count" data-rule="1" data-descriptor="1""#
    ));
}

#[test]
fn test_malformed_store_renders_what_it_can() {
    let mut sections = RuleStore::new().sections();
    sections.rsd_conts.clear();
    let store = RuleStore::from_sections(sections, Limits::default());

    let markup = render_rules(&store).unwrap();
    assert!(markup.contains("URSP Rule 0"));
    assert!(markup.contains("RSD 0_0"));
    assert!(!markup.contains("RSD Type 0_0_0"));
}

#[test]
fn test_page_has_every_bound_element() {
    let page = PageContext::from_settings(&Settings::default());
    let html = render_page(&RuleStore::new(), &page).unwrap();

    let ids = [
        element_ids::URSP_CONTAINER,
        element_ids::PTI,
        element_ids::PLMN,
        element_ids::UPSC,
        element_ids::URSP_COUNT,
        element_ids::LOG_TEXT,
        element_ids::RESULT_SECTIONS,
        element_ids::RESULT_TEXT,
        element_ids::ENCODE_BUTTON,
        element_ids::DECODE_BUTTON,
        element_ids::SAVE_BUTTON,
        element_ids::ENCODE_STATUS,
        element_ids::DECODE_STATUS,
        element_ids::SAVE_STATUS,
    ];
    for id in ids {
        assert!(html.contains(&format!(r#"id="{}""#, id)), "missing #{}", id);
    }
    assert!(html.contains(r#"name="ursp-0-pv""#));
    assert!(html.contains("45006F"));
}

#[test]
fn test_save_status_sits_on_result_tab() {
    let page = PageContext::from_settings(&Settings::default());
    let html = render_page(&RuleStore::new(), &page).unwrap();

    let tab = html.find(r#"id="result-tab""#).unwrap();
    let button = html.find(r#"id="save-btn""#).unwrap();
    let status = html.find(r#"id="save-status""#).unwrap();
    assert!(tab < button && button < status);
    assert!(!html[status..].contains(r#"class="tab-content"#));
}

#[test]
fn test_results_markup() {
    let rules = EncodedRules {
        ef_ursp: Some("00 1F".to_string()),
        dl_nas: None,
        ursp_info: Some("URSP rule 1".to_string()),
        ursp_conts: Some("RSD 1".to_string()),
        pol_cmd_txt: Some("<cmd>".to_string()),
    };
    let html = render_results(&ResultView::from_rules(&rules)).unwrap();
    assert!(html.contains("SIM EF_URSP"));
    assert!(!html.contains("DL NAS TRANSPORT"));
    assert!(html.contains("MANAGE UE POLICY COMMAND"));
    assert!(html.contains("&lt;cmd&gt;"));
    assert!(!html.contains("<cmd>"));

    let decoded = DecodeResponse {
        success: true,
        message_type: Some("UL NAS Transport".to_string()),
        usi_result: Some("UE STATE INDICATION".to_string()),
        ..Default::default()
    };
    let view = ResultView::from_decode(&decoded);
    assert_eq!(
        view,
        ResultView::Text {
            text: "UE STATE INDICATION".to_string()
        }
    );
    assert!(render_results(&view).unwrap().contains("UE STATE INDICATION"));
}
