use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::{
    parse_response, BackendError, BackendService, DecodeRequest, DecodeResponse, EncodeRequest,
    EncodeResponse, SaveExcelResponse, ServiceResponse, DECODE_PATH, ENCODE_PATH,
    SAVE_EXCEL_PATH,
};
use crate::settings::Settings;

/// Backend reached over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = base_url_with_slash(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ursp-editor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::new(
            &settings.backend_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
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

        let mut request = self.client.post(url.clone());
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!("Backend answered {} for {}", status, url);
        }
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

/// Parse the backend base URL so relative endpoint paths append to it
pub(crate) fn base_url_with_slash(base_url: &str) -> Result<Url, BackendError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| BackendError::Network(format!("Invalid backend URL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_append_to_base_path() {
        let base = base_url_with_slash("http://10.0.0.1:8081/ursp").unwrap();
        assert_eq!(
            base.join(ENCODE_PATH).unwrap().as_str(),
            "http://10.0.0.1:8081/ursp/encode"
        );
        let base = base_url_with_slash("http://127.0.0.1:8081").unwrap();
        assert_eq!(
            base.join(SAVE_EXCEL_PATH).unwrap().as_str(),
            "http://127.0.0.1:8081/save_excel"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(HttpBackend::new("not a url", Duration::from_secs(1)).is_err());
    }
}
