pub mod hex;
pub mod time;

#[cfg(not(target_arch = "wasm32"))]
#[path = "http_std.rs"]
pub mod http;
#[cfg(target_arch = "wasm32")]
#[path = "http_wasm.rs"]
pub mod http;

pub use http::HttpBackend;
