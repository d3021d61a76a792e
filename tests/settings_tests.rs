use std::io::Write;

use ursp_editor::settings::{
    update_settings_from_content, update_settings_from_file, Settings, SettingsError,
};

const YAML_SETTINGS: &str = r#"
common:
  backend_url: "http://encoder.local:9000"
  log_level: debug
server:
  listen_port: 9090
  wasm_module: "/pkg/ursp_editor.js"
editor:
  submit_cooldown_ms: 250
  default_plmn: "00101F"
"#;

const TOML_SETTINGS: &str = r#"
[common]
backend_url = "http://encoder.local:9000"
log_level = "debug"

[server]
listen_port = 9090
wasm_module = "/pkg/ursp_editor.js"

[editor]
submit_cooldown_ms = 250
default_plmn = "00101F"
"#;

#[test]
fn test_yaml_and_toml_agree() {
    let yaml = Settings::load_from_content(YAML_SETTINGS).unwrap();
    let toml = Settings::load_from_content(TOML_SETTINGS).unwrap();
    assert_eq!(yaml, toml);

    assert_eq!(yaml.backend_url, "http://encoder.local:9000");
    assert_eq!(yaml.log_level, "debug");
    assert_eq!(yaml.listen_port, 9090);
    assert_eq!(yaml.listen_address, "127.0.0.1");
    assert_eq!(yaml.wasm_module.as_deref(), Some("/pkg/ursp_editor.js"));
    assert_eq!(yaml.submit_cooldown_ms, 250);
    assert_eq!(yaml.default_plmn, "00101F");
    assert_eq!(yaml.default_pti, "151");
    assert_eq!(yaml.max_rules, 5);
}

#[test]
fn test_yaml_without_common_section() {
    let settings = Settings::load_from_content("editor:\n  max_rules: 3\n").unwrap();
    assert_eq!(settings.max_rules, 3);
    assert_eq!(settings.backend_url, "http://127.0.0.1:8081");
}

#[test]
fn test_toml_mentioning_common_key() {
    let settings = Settings::load_from_content(
        "# common: shared by all hosts\n[common]\nbackend_url = \"http://common:8081\"\n",
    )
    .unwrap();
    assert_eq!(settings.backend_url, "http://common:8081");
}

#[test]
fn test_blank_values_fall_back() {
    let settings = Settings::load_from_content(
        r#"
        [server]
        listen_address = "  "
        wasm_module = ""
        "#,
    )
    .unwrap();
    assert_eq!(settings.listen_address, "127.0.0.1");
    assert_eq!(settings.wasm_module, None);
}

#[test]
fn test_bad_backend_url_rejected() {
    let err = Settings::load_from_content("[common]\nbackend_url = \"not a url\"\n").unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Invalid {
            key: "backend_url",
            ..
        }
    ));
}

#[test]
fn test_malformed_file_rejected() {
    assert!(matches!(
        Settings::load_from_content("[editor\nmax_rules = 2"),
        Err(SettingsError::Toml(_))
    ));
    assert!(matches!(
        Settings::load_from_content("common:\n  log_level: [debug"),
        Err(SettingsError::Yaml(_))
    ));
    assert!(matches!(
        Settings::load_from_file("/nonexistent/ursp-editor.toml"),
        Err(SettingsError::Io(_))
    ));
}

#[test]
fn test_global_settings_update() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(TOML_SETTINGS.as_bytes()).unwrap();
    file.flush().unwrap();

    update_settings_from_file(file.path()).unwrap();
    let current = Settings::current();
    assert_eq!(current.listen_port, 9090);
    assert_eq!(current.pref_path, file.path().display().to_string());

    update_settings_from_content("[editor]\nmax_descriptors = 2\n").unwrap();
    let current = Settings::current();
    assert_eq!(current.max_descriptors, 2);
    assert_eq!(current.listen_port, 8082);
    assert_eq!(current.pref_path, "");

    // a failed update keeps the previous settings
    assert!(update_settings_from_content("[editor]\nmax_rules = 0\n").is_err());
    assert_eq!(Settings::current().max_descriptors, 2);
}
