//! Settings module for the URSP editor
//!
//! Settings come from a sectioned TOML or YAML file (`[common]`, `[server]`,
//! `[editor]`) and are published process-wide through [`Settings::current`].

pub mod file_settings;
pub mod settings_struct;

pub use file_settings::SettingsFile;
pub use settings_struct::{
    update_settings_from_content, update_settings_from_file, Settings, SettingsError,
};
