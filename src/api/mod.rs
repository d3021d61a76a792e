//! Browser entry points, compiled for `wasm32` only.

pub mod editor;
pub mod init;

pub use editor::UrspEditor;
pub use init::{init_wasm_logging, initialize_settings_from_content};
