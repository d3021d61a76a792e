use serde::{Deserialize, Serialize};

use crate::constants::defaults::{DEFAULT_MAX_COUNT, DEFAULT_PLMN, DEFAULT_PTI, DEFAULT_UPSC};

pub fn default_backend_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

pub fn default_request_timeout_secs() -> u64 {
    15
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

pub fn default_listen_port() -> u16 {
    8082
}

pub fn default_submit_cooldown_ms() -> u64 {
    1000
}

pub fn default_max_count() -> usize {
    DEFAULT_MAX_COUNT
}

fn default_pti() -> String {
    DEFAULT_PTI.to_string()
}

fn default_plmn() -> String {
    DEFAULT_PLMN.to_string()
}

fn default_upsc() -> String {
    DEFAULT_UPSC.to_string()
}

/// `[common]`: where the encoder lives and how loud to be
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSection {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CommonSection {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

/// `[server]`: the page host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// URL of the WASM glue module; the page falls back to server-side
    /// editing when unset
    pub wasm_module: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            wasm_module: None,
        }
    }
}

/// `[editor]`: form limits and session context defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    #[serde(default = "default_submit_cooldown_ms")]
    pub submit_cooldown_ms: u64,
    #[serde(default = "default_max_count")]
    pub max_rules: usize,
    #[serde(default = "default_max_count")]
    pub max_descriptors: usize,
    #[serde(default = "default_max_count")]
    pub max_contents: usize,
    #[serde(default = "default_pti")]
    pub default_pti: String,
    #[serde(default = "default_plmn")]
    pub default_plmn: String,
    #[serde(default = "default_upsc")]
    pub default_upsc: String,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            submit_cooldown_ms: default_submit_cooldown_ms(),
            max_rules: default_max_count(),
            max_descriptors: default_max_count(),
            max_contents: default_max_count(),
            default_pti: default_pti(),
            default_plmn: default_plmn(),
            default_upsc: default_upsc(),
        }
    }
}

/// On-disk layout shared by the TOML and YAML formats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub common: CommonSection,
    pub server: ServerSection,
    pub editor: EditorSection,
}
