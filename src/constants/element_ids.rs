//! Element ids the page glue binds to. Changing any of these breaks the
//! page template and the WASM front end at the same time.

pub const URSP_CONTAINER: &str = "ursp-container";
pub const PTI: &str = "pti";
pub const PLMN: &str = "plmn";
pub const UPSC: &str = "upsc";
pub const URSP_COUNT: &str = "ursp-count";
pub const LOG_TEXT: &str = "log-text";
pub const RESULT_SECTIONS: &str = "result-sections";
pub const RESULT_TEXT: &str = "result-text";
pub const ENCODE_BUTTON: &str = "encode-btn";
pub const DECODE_BUTTON: &str = "decode-btn";
pub const SAVE_BUTTON: &str = "save-btn";
pub const ENCODE_STATUS: &str = "encode-status";
pub const DECODE_STATUS: &str = "decode-status";
pub const SAVE_STATUS: &str = "save-status";
