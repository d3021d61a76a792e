use log::{info, Level};
use wasm_bindgen::prelude::*;

use crate::settings::update_settings_from_content;

#[wasm_bindgen]
pub fn initialize_settings_from_content(content: &str) -> Result<(), JsValue> {
    match update_settings_from_content(content) {
        Ok(()) => Ok(()),
        Err(err) => {
            web_sys::console::error_1(&format!("Failed to initialize settings: {}", err).into());
            Err(JsValue::from_str(&format!(
                "Failed to initialize settings: {}",
                err
            )))
        }
    }
}

#[wasm_bindgen]
pub fn init_wasm_logging(level: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let log_level = match level.as_deref() {
        Some("error") => Level::Error,
        Some("warn") => Level::Warn,
        Some("info") => Level::Info,
        Some("debug") => Level::Debug,
        Some("trace") => Level::Trace,
        _ => Level::Info, // Default to Info level
    };

    console_log::init_with_level(log_level)
        .map_err(|e| JsValue::from_str(&format!("Failed to initialize logger: {}", e)))?;

    info!("WASM logging initialized at level: {}", log_level);
    Ok(())
}
