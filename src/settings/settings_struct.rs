use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};

use log::{debug, info};
use thiserror::Error;

use super::file_settings::{
    default_backend_url, default_listen_address, default_listen_port, default_log_level,
    default_max_count, default_request_timeout_secs, default_submit_cooldown_ms, SettingsFile,
};
use crate::constants::defaults::{DEFAULT_PLMN, DEFAULT_PTI, DEFAULT_UPSC};
use crate::models::Limits;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Global configuration of the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub pref_path: String,

    // Backend
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,

    // Server
    pub listen_address: String,
    pub listen_port: u16,
    pub wasm_module: Option<String>,

    // Editor
    pub submit_cooldown_ms: u64,
    pub max_rules: usize,
    pub max_descriptors: usize,
    pub max_contents: usize,
    pub default_pti: String,
    pub default_plmn: String,
    pub default_upsc: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pref_path: String::new(),
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            wasm_module: None,
            submit_cooldown_ms: default_submit_cooldown_ms(),
            max_rules: default_max_count(),
            max_descriptors: default_max_count(),
            max_contents: default_max_count(),
            default_pti: DEFAULT_PTI.to_string(),
            default_plmn: DEFAULT_PLMN.to_string(),
            default_upsc: DEFAULT_UPSC.to_string(),
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let mut settings = Self {
            pref_path: String::new(),
            backend_url: file.common.backend_url,
            request_timeout_secs: file.common.request_timeout_secs,
            log_level: file.common.log_level,
            listen_address: file.server.listen_address,
            listen_port: file.server.listen_port,
            wasm_module: file.server.wasm_module.filter(|m| !m.trim().is_empty()),
            submit_cooldown_ms: file.editor.submit_cooldown_ms,
            max_rules: file.editor.max_rules,
            max_descriptors: file.editor.max_descriptors,
            max_contents: file.editor.max_contents,
            default_pti: file.editor.default_pti,
            default_plmn: file.editor.default_plmn,
            default_upsc: file.editor.default_upsc,
        };

        // Ensure listen_address is not empty
        if settings.listen_address.trim().is_empty() {
            settings.listen_address = default_listen_address();
        }
        settings
    }
}

impl Settings {
    /// Create a new settings instance with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current() -> Arc<Settings> {
        match global.read() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Count limits of the rule form
    pub fn limits(&self) -> Limits {
        Limits {
            max_rules: self.max_rules,
            max_descriptors: self.max_descriptors,
            max_contents: self.max_contents,
        }
    }

    /// Parse settings content. Content with a `common:` key is tried as YAML
    /// first, anything else as TOML first; when that parse fails the other
    /// format is tried before giving up with the first error.
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        let yaml_first = content.contains("common:");
        let (first, second): (ParseFn, ParseFn) = if yaml_first {
            (parse_yaml, parse_toml)
        } else {
            (parse_toml, parse_yaml)
        };

        let file = match first(content) {
            Ok(file) => file,
            Err(e) => {
                debug!("Settings are not {}: {}", format_name(yaml_first), e);
                second(content).map_err(|_| e)?
            }
        };

        let settings = Settings::from(file);
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut settings = Settings::load_from_content(&content)?;
        settings.pref_path = path.display().to_string();
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let counts = [
            ("max_rules", self.max_rules),
            ("max_descriptors", self.max_descriptors),
            ("max_contents", self.max_contents),
        ];
        for (key, value) in counts {
            if value < 1 {
                return Err(SettingsError::Invalid {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        url::Url::parse(&self.backend_url).map_err(|e| SettingsError::Invalid {
            key: "backend_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

type ParseFn = fn(&str) -> Result<SettingsFile, SettingsError>;

fn parse_toml(content: &str) -> Result<SettingsFile, SettingsError> {
    Ok(toml::from_str(content)?)
}

fn parse_yaml(content: &str) -> Result<SettingsFile, SettingsError> {
    Ok(serde_yaml::from_str(content)?)
}

fn format_name(yaml: bool) -> &'static str {
    if yaml {
        "YAML"
    } else {
        "TOML"
    }
}

// Global settings instance
#[allow(non_upper_case_globals)]
pub static global: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

fn replace_global(settings: Settings) {
    let settings = Arc::new(settings);
    match global.write() {
        Ok(mut current) => *current = settings,
        Err(poisoned) => *poisoned.into_inner() = settings,
    }
}

/// Load a settings file and make it the current configuration
pub fn update_settings_from_file(path: impl AsRef<Path>) -> Result<(), SettingsError> {
    let settings = Settings::load_from_file(path)?;
    info!("Loaded settings from {}", settings.pref_path);
    replace_global(settings);
    Ok(())
}

/// Parse settings content and make it the current configuration
pub fn update_settings_from_content(content: &str) -> Result<(), SettingsError> {
    let settings = Settings::load_from_content(content)?;
    replace_global(settings);
    Ok(())
}
