//! Request and response shapes of the URSP encoder/decoder service.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Sections;

/// `message_type` of a decoded downlink policy delivery
pub const DL_NAS_TRANSPORT: &str = "DL NAS Transport";

pub const ENCODE_PATH: &str = "encode";
pub const DECODE_PATH: &str = "decode";
pub const SAVE_EXCEL_PATH: &str = "save_excel";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service answered `success: false`
    #[error("Error: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Body of `POST /encode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub pti: String,
    pub plmn: String,
    pub upsc: String,
    #[serde(flatten)]
    pub sections: Sections,
}

/// Body of `POST /decode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub log_text: String,
}

/// Rendered forms of an encoded rule set, shared by encode and decode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_ursp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_nas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ursp_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ursp_conts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pol_cmd_txt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub rules: EncodedRules,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usi_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_reject: Option<bool>,
    #[serde(flatten)]
    pub rules: EncodedRules,
}

impl DecodeResponse {
    /// Whether the log held a full downlink rule delivery
    pub fn is_dl_nas_transport(&self) -> bool {
        self.message_type.as_deref() == Some(DL_NAS_TRANSPORT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveExcelResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Responses that carry a `success` flag and an optional error message
pub trait ServiceResponse: Sized {
    fn success(&self) -> bool;
    fn error_message(&self) -> Option<&str>;

    /// Turn `success: false` into [`BackendError::Rejected`]
    fn into_result(self) -> Result<Self, BackendError> {
        if self.success() {
            Ok(self)
        } else {
            let message = self.error_message().unwrap_or("Unknown error").to_string();
            Err(BackendError::Rejected(message))
        }
    }
}

macro_rules! service_response {
    ($($ty:ty),*) => {
        $(
            impl ServiceResponse for $ty {
                fn success(&self) -> bool {
                    self.success
                }

                fn error_message(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )*
    };
}

service_response!(EncodeResponse, DecodeResponse, SaveExcelResponse);

/// Parse a service body, whatever the HTTP status.
///
/// The service reports failures as `400` with a JSON body, so the body is
/// the only source of truth.
pub fn parse_response<T>(body: &str) -> Result<T, BackendError>
where
    T: for<'de> Deserialize<'de> + ServiceResponse,
{
    let response: T = serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    response.into_result()
}

/// The encoder/decoder service
pub trait BackendService {
    fn encode(
        &self,
        request: &EncodeRequest,
    ) -> impl Future<Output = Result<EncodeResponse, BackendError>>;
    fn decode(
        &self,
        request: &DecodeRequest,
    ) -> impl Future<Output = Result<DecodeResponse, BackendError>>;
    fn save_excel(&self) -> impl Future<Output = Result<SaveExcelResponse, BackendError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_message() {
        let result: Result<EncodeResponse, _> =
            parse_response(r#"{"success": false, "error": "list index out of range"}"#);
        assert_eq!(
            result,
            Err(BackendError::Rejected("list index out of range".to_string()))
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error: list index out of range"
        );
    }

    #[test]
    fn test_non_json_body() {
        let result: Result<DecodeResponse, _> = parse_response("<html>502</html>");
        assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
    }

    #[test]
    fn test_decode_fields() {
        let response: DecodeResponse = parse_response(
            r#"{"success": true, "message_type": "DL NAS Transport", "ef_ursp": "01 02", "pol_cmd_txt": "cmd"}"#,
        )
        .unwrap();
        assert!(response.is_dl_nas_transport());
        assert_eq!(response.rules.ef_ursp.as_deref(), Some("01 02"));
        assert_eq!(response.is_reject, None);
    }

    #[test]
    fn test_encode_request_shape() {
        let request = EncodeRequest {
            pti: "151".to_string(),
            plmn: "45006F".to_string(),
            upsc: "2".to_string(),
            sections: crate::models::RuleStore::new().sections(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pti"], "151");
        assert_eq!(
            json["ursp_sum"],
            serde_json::json!([["URSP_0", "1", "Match-all", "-", 1]])
        );
        assert_eq!(json["rsd_sum"], serde_json::json!([[["RSD_0_0", "1", 1]]]));
        assert_eq!(
            json["rsd_conts"],
            serde_json::json!([[[["RSD_0_0_0", "SSC mode", ""]]]])
        );
    }
}
