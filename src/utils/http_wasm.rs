use log::debug;
use serde::de::DeserializeOwned;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::backend::{
    parse_response, BackendError, BackendService, DecodeRequest, DecodeResponse, EncodeRequest,
    EncodeResponse, SaveExcelResponse, ServiceResponse, DECODE_PATH, ENCODE_PATH,
    SAVE_EXCEL_PATH,
};
use crate::settings::Settings;

/// Backend reached with the browser fetch API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| BackendError::Network(format!("Invalid backend URL: {}", e)))?;
        Ok(Self { base })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::new(&settings.backend_url)
    }

    async fn post<T>(&self, path: &str, body: Option<String>) -> Result<T, BackendError>
    where
        T: DeserializeOwned + ServiceResponse,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| BackendError::Network(format!("Invalid backend URL: {}", e)))?;
        debug!("POST {}", url);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url.as_str(), &opts)
            .map_err(|e| BackendError::Network(format!("Failed to create request: {:?}", e)))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| BackendError::Network(format!("Failed to set header: {:?}", e)))?;
        }

        let window = web_sys::window()
            .ok_or_else(|| BackendError::Network("No window object available".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| BackendError::Network(format!("{:?}", e)))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|_| BackendError::Network("Failed to convert response".to_string()))?;

        let text_promise = response
            .text()
            .map_err(|e| BackendError::Network(format!("Failed to get response text: {:?}", e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| BackendError::Network(format!("Failed to read response body: {:?}", e)))?
            .as_string()
            .ok_or_else(|| BackendError::InvalidResponse("Response body is not text".to_string()))?;

        parse_response(&text)
    }
}

impl BackendService for HttpBackend {
    async fn encode(&self, request: &EncodeRequest) -> Result<EncodeResponse, BackendError> {
        let body = serde_json::to_string(request)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        self.post(ENCODE_PATH, Some(body)).await
    }

    async fn decode(&self, request: &DecodeRequest) -> Result<DecodeResponse, BackendError> {
        let body = serde_json::to_string(request)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        self.post(DECODE_PATH, Some(body)).await
    }

    async fn save_excel(&self) -> Result<SaveExcelResponse, BackendError> {
        self.post(SAVE_EXCEL_PATH, None).await
    }
}
