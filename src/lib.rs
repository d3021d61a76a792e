//! Editor for 3GPP URSP (UE Route Selection Policy) rule sets.
//!
//! The rule tree lives in [`models::RuleStore`]; [`template`] renders it as
//! an HTML form, [`view`] reads edited values back, and [`interfaces`]
//! validates and submits the result to the encoder/decoder service.

pub mod backend;
pub mod constants;
pub mod interfaces;
pub mod models;
pub mod settings;
pub mod template;
pub mod utils;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod api;

#[cfg(feature = "web-api")]
pub mod web_handlers;

pub use models::{EditorAction, RuleStore};
pub use settings::Settings;
