#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use regex::Regex;
use ursp_editor::backend::{
    BackendError, BackendService, DecodeRequest, DecodeResponse, EncodeRequest, EncodeResponse,
    EncodedRules, SaveExcelResponse,
};
use ursp_editor::models::FieldPath;
use ursp_editor::view::{FieldState, FormSnapshot};

/// Backend double that records requests and answers with canned replies
#[derive(Debug)]
pub struct MockBackend {
    pub encode_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
    pub last_encode: Mutex<Option<EncodeRequest>>,
    pub encode_reply: Result<EncodeResponse, BackendError>,
    pub decode_reply: Result<DecodeResponse, BackendError>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            encode_calls: AtomicUsize::new(0),
            decode_calls: AtomicUsize::new(0),
            last_encode: Mutex::new(None),
            encode_reply: Ok(encoded()),
            decode_reply: Ok(DecodeResponse {
                success: true,
                message_type: Some("UL NAS Transport".to_string()),
                info: Some("UE policy container type: UE STATE INDICATION".to_string()),
                is_reject: Some(false),
                ..Default::default()
            }),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            encode_reply: Err(BackendError::Rejected(message.to_string())),
            ..Self::new()
        }
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    pub fn last_encode(&self) -> Option<EncodeRequest> {
        self.last_encode.lock().unwrap().clone()
    }
}

impl BackendService for MockBackend {
    async fn encode(&self, request: &EncodeRequest) -> Result<EncodeResponse, BackendError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_encode.lock().unwrap() = Some(request.clone());
        self.encode_reply.clone()
    }

    async fn decode(&self, _request: &DecodeRequest) -> Result<DecodeResponse, BackendError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        self.decode_reply.clone()
    }

    async fn save_excel(&self) -> Result<SaveExcelResponse, BackendError> {
        Ok(SaveExcelResponse {
            success: true,
            filename: Some("MANAGE_UE_POLICY_COMMAND_20250101_000000.xlsx".to_string()),
            path: None,
            error: None,
        })
    }
}

pub fn encoded() -> EncodeResponse {
    EncodeResponse {
        success: true,
        error: None,
        rules: EncodedRules {
            ef_ursp: Some("00 1F 01".to_string()),
            dl_nas: Some("7E 00 68 05".to_string()),
            ursp_info: Some("URSP rule 1".to_string()),
            ursp_conts: Some("Match-all".to_string()),
            pol_cmd_txt: Some("MANAGE UE POLICY COMMAND".to_string()),
        },
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2f;", "/")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Read every named input out of rendered markup, the way a browser would
/// see the form
pub fn scan_form(markup: &str) -> FormSnapshot {
    let input = Regex::new(r"<input\b[^>]*>").unwrap();
    let name = Regex::new(r#"\bname="([^"]*)""#).unwrap();
    let value = Regex::new(r#"\bvalue="([^"]*)""#).unwrap();
    let disabled = Regex::new(r"\sdisabled[\s>]").unwrap();

    let mut snapshot = FormSnapshot::new();
    for tag in input.find_iter(markup).map(|m| m.as_str()) {
        let Some(path) = name
            .captures(tag)
            .and_then(|c| FieldPath::from_name(&c[1]))
        else {
            continue;
        };
        let value = value
            .captures(tag)
            .map(|c| unescape(&c[1]))
            .unwrap_or_default();
        let state = FieldState {
            value,
            disabled: disabled.is_match(tag),
        };
        snapshot.insert(path, state);
    }
    snapshot
}
